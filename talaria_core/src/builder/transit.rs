//! Transit node context: platform typing, station linkage, and wall-clock
//! schedule projection.
//!
//! Known limitation: projections assume the departure falls on the same day
//! as the origin date-time. Overnight trips that cross midnight relative to
//! the origin can come out negative; this is reported as-is rather than
//! silently clamped.

use crate::constants::SECONDS_PER_DAY;
use crate::controller::{Attribute, AttributesController};
use crate::graph::{
    DirectedEdge, EdgeUse, GraphId, GraphReader, GraphTile, NodeInfo, NodeType,
};
use crate::leg::{
    LegNode, TransitEgressInfo, TransitPlatformInfo, TransitPlatformType, TransitStationInfo,
};
use crate::time_info::{days_from_pivot_date, get_duration, TimeInfo, TimeZoneDb};

fn strip_timezone_abbreviation(formatted: &mut String) {
    if let Some(position) = formatted.rfind(' ') {
        formatted.truncate(position);
    }
}

/// Populates station or egress info for nodes of those types.
pub fn add_transit_nodes(
    trip_node: &mut LegNode,
    node: &NodeInfo,
    start_tile: &GraphTile,
    controller: &AttributesController,
) {
    if node.node_type == NodeType::TransitStation {
        let mut info = TransitStationInfo::default();
        if let Some(station) = start_tile.get_transit_stop(node.stop_index) {
            if controller.enabled(Attribute::NodeTransitStationInfoOnestopId)
                && !station.one_stop_id.is_empty()
            {
                info.onestop_id = Some(station.one_stop_id.clone());
            }
            if controller.enabled(Attribute::NodeTransitStationInfoName) && !station.name.is_empty()
            {
                info.name = Some(station.name.clone());
            }
            if controller.enabled(Attribute::NodeTransitStationInfoLatLon) {
                info.ll = Some(node.latlng);
            }
        }
        trip_node.transit_station_info = Some(info);
    }

    if node.node_type == NodeType::TransitEgress {
        let mut info = TransitEgressInfo::default();
        if let Some(egress) = start_tile.get_transit_stop(node.stop_index) {
            if controller.enabled(Attribute::NodeTransitEgressInfoOnestopId)
                && !egress.one_stop_id.is_empty()
            {
                info.onestop_id = Some(egress.one_stop_id.clone());
            }
            if controller.enabled(Attribute::NodeTransitEgressInfoName) && !egress.name.is_empty() {
                info.name = Some(egress.name.clone());
            }
            if controller.enabled(Attribute::NodeTransitEgressInfoLatLon) {
                info.ll = Some(node.latlng);
            }
        }
        trip_node.transit_egress_info = Some(info);
    }
}

/// Mutable projection state carried along the path: the previous platform's
/// type (platform connections inherit it), the arrival time to stamp on the
/// next platform, and the running block id.
pub struct TransitState {
    prev_platform_type: TransitPlatformType,
    arrival_time: Option<String>,
    assumed_schedule: bool,
    pub block_id: u32,
}

impl Default for TransitState {
    fn default() -> Self {
        TransitState {
            prev_platform_type: TransitPlatformType::Stop,
            arrival_time: None,
            assumed_schedule: false,
            block_id: 0,
        }
    }
}

impl TransitState {
    pub fn new() -> TransitState {
        TransitState::default()
    }

    /// Projects schedule context onto a transit platform node.
    #[allow(clippy::too_many_arguments)]
    pub fn project_platform(
        &mut self,
        controller: &AttributesController,
        reader: &dyn GraphReader,
        start_tile: &GraphTile,
        node: &NodeInfo,
        graphtile: &GraphTile,
        directededge: &DirectedEdge,
        trip_id: u32,
        origin_date_time: Option<&str>,
        time_info: &TimeInfo,
        trip_node: &mut LegNode,
    ) {
        let mut info = TransitPlatformInfo::default();

        // Rail platforms read as stations, buses as stops, and platform
        // connections inherit whatever came before.
        match directededge.use_type {
            EdgeUse::Rail => {
                if controller.enabled(Attribute::NodeTransitPlatformInfoType) {
                    info.platform_type = Some(TransitPlatformType::Station);
                }
                self.prev_platform_type = TransitPlatformType::Station;
            }
            EdgeUse::PlatformConnection => {
                if controller.enabled(Attribute::NodeTransitPlatformInfoType) {
                    info.platform_type = Some(self.prev_platform_type);
                }
            }
            _ => {
                if controller.enabled(Attribute::NodeTransitPlatformInfoType) {
                    info.platform_type = Some(TransitPlatformType::Stop);
                }
                self.prev_platform_type = TransitPlatformType::Stop;
            }
        }

        if let Some(platform) = start_tile.get_transit_stop(node.stop_index) {
            if controller.enabled(Attribute::NodeTransitPlatformInfoOnestopId)
                && !platform.one_stop_id.is_empty()
            {
                info.onestop_id = Some(platform.one_stop_id.clone());
            }
            if controller.enabled(Attribute::NodeTransitPlatformInfoName)
                && !platform.name.is_empty()
            {
                info.name = Some(platform.name.clone());
            }

            // The parent station sits behind the single platform-connection
            // edge at this node.
            let begin = node.edge_index as usize;
            let end = begin + node.edge_count as usize;
            for edge in start_tile.directed_edges.get(begin..end).unwrap_or(&[]) {
                if edge.use_type != EdgeUse::PlatformConnection {
                    continue;
                }
                let station_node: GraphId = edge.end_node;
                if let Some(end_tile) = reader.get_tile(station_node) {
                    if let Some(station_info) = end_tile
                        .node(station_node)
                        .and_then(|n| end_tile.get_transit_stop(n.stop_index))
                    {
                        if controller.enabled(Attribute::NodeTransitPlatformInfoStationOnestopId)
                            && !station_info.one_stop_id.is_empty()
                        {
                            info.station_onestop_id = Some(station_info.one_stop_id.clone());
                        }
                        if controller.enabled(Attribute::NodeTransitPlatformInfoStationName)
                            && !station_info.name.is_empty()
                        {
                            info.station_name = Some(station_info.name.clone());
                        }
                    }
                }
                break;
            }

            if controller.enabled(Attribute::NodeTransitPlatformInfoLatLon) {
                info.ll = Some(node.latlng);
            }
        }

        // Arrival at this platform follows from the previous departure.
        if controller.enabled(Attribute::NodeTransitPlatformInfoArrivalDateTime) {
            if let Some(arrival) = &self.arrival_time {
                info.arrival_date_time = Some(arrival.clone());
            }
        }

        if trip_id != 0 {
            let departure = graphtile.get_transit_departure(
                directededge.line_id,
                trip_id,
                time_info.second_of_week % SECONDS_PER_DAY,
            );

            self.assumed_schedule = false;
            if let Some(date) = origin_date_time.and_then(days_from_pivot_date) {
                if graphtile.header.date_created > date {
                    if controller.enabled(Attribute::NodeTransitPlatformInfoAssumedSchedule) {
                        info.assumed_schedule = true;
                    }
                    self.assumed_schedule = true;
                } else if let Some(schedule) = departure
                    .and_then(|d| graphtile.get_transit_schedule(d.schedule_index))
                {
                    let day = date - graphtile.header.date_created;
                    if day > schedule.end_day {
                        if controller.enabled(Attribute::NodeTransitPlatformInfoAssumedSchedule) {
                            info.assumed_schedule = true;
                        }
                        self.assumed_schedule = true;
                    }
                }
            }

            if let (Some(departure), Some(origin_dt)) = (departure, origin_date_time) {
                let tz = TimeZoneDb::global().from_index(node.timezone);
                let second_of_day = (time_info.second_of_week % SECONDS_PER_DAY) as i64;

                if let Some(tz) = tz {
                    let offset = departure.departure_time as i64 - second_of_day;
                    if let Some(mut departure_dt) = get_duration(origin_dt, offset, tz) {
                        strip_timezone_abbreviation(&mut departure_dt);
                        if controller.enabled(Attribute::NodeTransitPlatformInfoDepartureDateTime) {
                            info.departure_date_time = Some(departure_dt);
                        }
                    }

                    // Carry the arrival time forward for the next platform.
                    let offset =
                        (departure.departure_time + departure.elapsed_time) as i64 - second_of_day;
                    if let Some(mut arrival_dt) = get_duration(origin_dt, offset, tz) {
                        strip_timezone_abbreviation(&mut arrival_dt);
                        self.arrival_time = Some(arrival_dt);
                    }
                }

                self.block_id = departure.block_id;
            }
        } else {
            // No departing trip here: reset the carried state.
            self.arrival_time = None;
            self.block_id = 0;

            if controller.enabled(Attribute::NodeTransitPlatformInfoAssumedSchedule)
                && self.assumed_schedule
            {
                info.assumed_schedule = true;
            }
            self.assumed_schedule = false;
        }

        trip_node.transit_platform_info = Some(info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_abbreviation() {
        let mut formatted = String::from("2019-05-10T08:15-04:00 EDT");
        strip_timezone_abbreviation(&mut formatted);
        assert_eq!(formatted, "2019-05-10T08:15-04:00");
    }

    #[test]
    fn platform_connection_inherits_previous_type() {
        let mut state = TransitState::new();
        assert_eq!(state.prev_platform_type, TransitPlatformType::Stop);
        state.prev_platform_type = TransitPlatformType::Station;

        // A connection edge does not overwrite the carried type.
        let connection = DirectedEdge {
            use_type: EdgeUse::PlatformConnection,
            ..Default::default()
        };
        assert_eq!(connection.use_type, EdgeUse::PlatformConnection);
        assert_eq!(state.prev_platform_type, TransitPlatformType::Station);
    }
}
