use super::{
    AccessRestriction, Admin, ComplexRestriction, DirectedEdge, EdgeInfo, GraphId,
    LaneConnectivity, NodeInfo, NodeTransition, Sign, TrafficSpeed, TransitDeparture, TransitRoute,
    TransitSchedule, TransitStop,
};

#[derive(Clone, Debug, Default)]
pub struct GraphTileHeader {
    pub graph_id: GraphId,
    /// Days from the schedule pivot date at which the tile was created.
    pub date_created: u32,
    /// Identifier of the source dataset (OSM changeset id).
    pub dataset_id: u64,
    pub has_elevation: bool,
}

/// One tile of the hierarchical graph, fully resident in memory. The on-disk
/// layout and its readers live elsewhere; the builder only consumes this view.
#[derive(Clone, Debug, Default)]
pub struct GraphTile {
    pub header: GraphTileHeader,
    pub nodes: Vec<NodeInfo>,
    pub transitions: Vec<NodeTransition>,
    pub directed_edges: Vec<DirectedEdge>,
    pub edge_infos: Vec<EdgeInfo>,
    /// Signs attached to directed edges, keyed by edge index.
    pub edge_signs: Vec<(u32, Sign)>,
    /// Signs attached to nodes (junction names), keyed by node index.
    pub node_signs: Vec<(u32, Sign)>,
    /// Turn lane direction masks, keyed by edge index, one entry per lane.
    pub turn_lanes: Vec<(u32, u16)>,
    pub lane_connectivity: Vec<(u32, LaneConnectivity)>,
    /// Sorted by `edge_index` (binary-searched at lookup).
    pub access_restrictions: Vec<AccessRestriction>,
    /// Complex restrictions starting at the keyed edge index.
    pub complex_restrictions: Vec<(u32, ComplexRestriction)>,
    pub transit_departures: Vec<TransitDeparture>,
    pub transit_stops: Vec<TransitStop>,
    pub transit_routes: Vec<TransitRoute>,
    pub transit_schedules: Vec<TransitSchedule>,
    pub admins: Vec<Admin>,
    /// Live traffic, indexed by edge index; may be empty or shorter than the
    /// edge table.
    pub traffic_speeds: Vec<TrafficSpeed>,
}

impl GraphTile {
    pub fn id(&self) -> GraphId {
        self.header.graph_id
    }

    /// Does the supplied graph id belong in this tile?
    pub fn may_contain(&self, id: GraphId) -> bool {
        id.tile_base() == self.id().tile_base()
    }

    pub fn node(&self, id: GraphId) -> Option<&NodeInfo> {
        if self.may_contain(id) {
            self.nodes.get(id.id() as usize)
        } else {
            None
        }
    }

    pub fn node_at(&self, index: u32) -> Option<&NodeInfo> {
        self.nodes.get(index as usize)
    }

    pub fn directed_edge(&self, id: GraphId) -> Option<&DirectedEdge> {
        if self.may_contain(id) {
            self.directed_edges.get(id.id() as usize)
        } else {
            None
        }
    }

    pub fn directed_edge_at(&self, index: u32) -> Option<&DirectedEdge> {
        self.directed_edges.get(index as usize)
    }

    /// Transitions of a node to its twins on other hierarchy levels.
    pub fn transitions(&self, node: &NodeInfo) -> &[NodeTransition] {
        let begin = node.transition_index as usize;
        let end = (node.transition_index + node.transition_count) as usize;
        self.transitions.get(begin..end).unwrap_or(&[])
    }

    pub fn edge_info(&self, edge: &DirectedEdge) -> Option<&EdgeInfo> {
        self.edge_infos.get(edge.edge_info_index as usize)
    }

    /// The id of the opposing directed edge, valid only when the edge ends in
    /// this tile.
    pub fn opposing_edge_id(&self, edge: &DirectedEdge) -> Option<GraphId> {
        let node = self.node(edge.end_node)?;
        Some(edge.end_node.with_id(node.edge_index + edge.opposing_index))
    }

    pub fn signs(&self, edge_index: u32) -> Vec<&Sign> {
        self.edge_signs
            .iter()
            .filter(|(index, _)| *index == edge_index)
            .map(|(_, sign)| sign)
            .collect()
    }

    pub fn signs_for_node(&self, node_index: u32) -> Vec<&Sign> {
        self.node_signs
            .iter()
            .filter(|(index, _)| *index == node_index)
            .map(|(_, sign)| sign)
            .collect()
    }

    pub fn turn_lanes(&self, edge_index: u32) -> Vec<u16> {
        self.turn_lanes
            .iter()
            .filter(|(index, _)| *index == edge_index)
            .map(|(_, mask)| *mask)
            .collect()
    }

    pub fn lane_connectivities(&self, edge_index: u32) -> Vec<&LaneConnectivity> {
        self.lane_connectivity
            .iter()
            .filter(|(index, _)| *index == edge_index)
            .map(|(_, lane)| lane)
            .collect()
    }

    /// Access restrictions for an edge that affect any of the given modes.
    /// The table is pre-sorted by edge index, so the start is binary-searched.
    pub fn get_access_restrictions(&self, edge_index: u32, modes: u16) -> Vec<&AccessRestriction> {
        let start = self
            .access_restrictions
            .partition_point(|r| r.edge_index < edge_index);
        self.access_restrictions
            .iter()
            .skip(start)
            .take_while(|r| r.edge_index == edge_index)
            .filter(|r| r.modes & modes != 0)
            .collect()
    }

    /// Complex restrictions anchored at the end of the given edge that affect
    /// any of the given modes.
    pub fn get_restrictions(&self, edge_index: u32, modes: u16) -> Vec<&ComplexRestriction> {
        self.complex_restrictions
            .iter()
            .filter(|(index, r)| *index == edge_index && r.modes & modes != 0)
            .map(|(_, r)| r)
            .collect()
    }

    /// Departure of `trip_id` on `line_id` at or after `day_seconds` (seconds
    /// from local midnight); falls back to the last departure of that trip.
    pub fn get_transit_departure(
        &self,
        line_id: u32,
        trip_id: u32,
        day_seconds: u32,
    ) -> Option<&TransitDeparture> {
        let mut last = None;
        for departure in self
            .transit_departures
            .iter()
            .filter(|d| d.line_id == line_id && d.trip_id == trip_id)
        {
            if departure.departure_time >= day_seconds {
                return Some(departure);
            }
            last = Some(departure);
        }
        last
    }

    pub fn get_transit_route(&self, index: u32) -> Option<&TransitRoute> {
        self.transit_routes.get(index as usize)
    }

    pub fn get_transit_stop(&self, index: u32) -> Option<&TransitStop> {
        self.transit_stops.get(index as usize)
    }

    pub fn get_transit_schedule(&self, index: u32) -> Option<&TransitSchedule> {
        self.transit_schedules.get(index as usize)
    }

    pub fn admin(&self, index: u32) -> Option<&Admin> {
        self.admins.get(index as usize)
    }

    pub fn traffic_speed(&self, edge_index: u32) -> TrafficSpeed {
        self.traffic_speeds
            .get(edge_index as usize)
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AccessRestrictionType, SignType};

    fn tile_id() -> GraphId {
        GraphId::from_parts(2, 100, 0).unwrap()
    }

    fn tile_with_restrictions() -> GraphTile {
        let restriction = |edge_index, modes| AccessRestriction {
            edge_index,
            restriction_type: AccessRestrictionType::TimedDenied,
            modes,
            value: 0,
            lanes: 0,
        };
        GraphTile {
            header: GraphTileHeader {
                graph_id: tile_id(),
                ..Default::default()
            },
            access_restrictions: vec![restriction(1, 1), restriction(3, 2), restriction(3, 1)],
            ..Default::default()
        }
    }

    #[test]
    fn mismatched_tile_base_rejected() {
        let tile = tile_with_restrictions();
        let foreign = GraphId::from_parts(2, 101, 0).unwrap();
        assert!(tile.directed_edge(foreign).is_none());
        assert!(tile.node(foreign).is_none());
    }

    #[test]
    fn access_restrictions_filter_by_edge_and_mode() {
        let tile = tile_with_restrictions();
        assert_eq!(tile.get_access_restrictions(1, 1).len(), 1);
        assert_eq!(tile.get_access_restrictions(1, 2).len(), 0);
        assert_eq!(tile.get_access_restrictions(3, 3).len(), 2);
        assert_eq!(tile.get_access_restrictions(2, 0xfff).len(), 0);
    }

    #[test]
    fn signs_keyed_by_index() {
        let mut tile = tile_with_restrictions();
        tile.edge_signs = vec![
            (0, Sign::new(SignType::ExitNumber, "12B", false)),
            (1, Sign::new(SignType::ExitToward, "Centre", false)),
            (0, Sign::new(SignType::ExitName, "Aerodrome", false)),
        ];
        assert_eq!(tile.signs(0).len(), 2);
        assert_eq!(tile.signs(1).len(), 1);
        assert_eq!(tile.signs(7).len(), 0);
    }

    #[test]
    fn departure_lookup_prefers_next_departure() {
        let mut tile = tile_with_restrictions();
        let departure = |time| TransitDeparture {
            line_id: 9,
            trip_id: 77,
            departure_time: time,
            ..Default::default()
        };
        tile.transit_departures = vec![departure(28_800), departure(36_000)];

        let found = tile.get_transit_departure(9, 77, 30_000).unwrap();
        assert_eq!(found.departure_time, 36_000);
        // Past the last departure we fall back to the final one.
        let found = tile.get_transit_departure(9, 77, 80_000).unwrap();
        assert_eq!(found.departure_time, 36_000);
        assert!(tile.get_transit_departure(9, 78, 0).is_none());
    }
}
