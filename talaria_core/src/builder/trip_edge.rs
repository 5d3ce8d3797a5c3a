//! Per-step edge record assembly. Every field is controller-gated; the lane
//! connectivity and complex-restriction analyses additionally feed the trace
//! log rather than the output contract.

use tracing::trace;

use crate::constants::{access, NO_ELEVATION_DATA, SECONDS_PER_DAY};
use crate::controller::{Attribute, AttributesController};
use crate::costing::{Costing, TravelMode};
use crate::graph::{
    AccessRestrictionType, CycleLane, DirectedEdge, EdgeUse, GraphId, GraphTile, RestrictionType,
    Sign, SignType, Traversability,
};
use crate::leg::{
    BicycleType, LegEdge, LegTravelMode, PedestrianType, SignBlock, Sidewalk, StreetName,
    TransitRouteInfo, VehicleType,
};
use crate::time_info::TimeZoneDb;

fn vehicle_type_from(travel_type: u8) -> VehicleType {
    match travel_type {
        1 => VehicleType::Motorcycle,
        2 => VehicleType::AutoBus,
        3 => VehicleType::Truck,
        4 => VehicleType::MotorScooter,
        _ => VehicleType::Car,
    }
}

fn pedestrian_type_from(travel_type: u8) -> PedestrianType {
    match travel_type {
        1 => PedestrianType::Wheelchair,
        2 => PedestrianType::Segway,
        _ => PedestrianType::Foot,
    }
}

fn bicycle_type_from(travel_type: u8) -> BicycleType {
    match travel_type {
        1 => BicycleType::Cross,
        2 => BicycleType::Hybrid,
        3 => BicycleType::Mountain,
        _ => BicycleType::Road,
    }
}

fn sign_target<'a>(block: &'a mut SignBlock, sign: &Sign) -> Option<(&'a mut Vec<StreetName>, Attribute)> {
    match sign.sign_type {
        SignType::ExitNumber => Some((&mut block.exit_numbers, Attribute::EdgeSignExitNumber)),
        SignType::ExitBranch => Some((&mut block.exit_onto_streets, Attribute::EdgeSignExitBranch)),
        SignType::ExitToward => Some((
            &mut block.exit_toward_locations,
            Attribute::EdgeSignExitToward,
        )),
        SignType::ExitName => Some((&mut block.exit_names, Attribute::EdgeSignExitName)),
        SignType::GuideBranch => Some((
            &mut block.guide_onto_streets,
            Attribute::EdgeSignGuideBranch,
        )),
        SignType::GuideToward => Some((
            &mut block.guide_toward_locations,
            Attribute::EdgeSignGuideToward,
        )),
        SignType::GuidanceViewJunction => Some((
            &mut block.guidance_view_junctions,
            Attribute::EdgeSignGuidanceViewJunction,
        )),
        SignType::JunctionName => Some((&mut block.junction_names, Attribute::EdgeSignJunctionName)),
    }
}

/// Builds the fully populated edge record for one path step.
#[allow(clippy::too_many_arguments)]
pub fn build_trip_edge(
    controller: &AttributesController,
    edge: GraphId,
    trip_id: u32,
    block_id: u32,
    mode: TravelMode,
    travel_type: u8,
    costing: &dyn Costing,
    directededge: &DirectedEdge,
    drive_on_right: bool,
    graphtile: &GraphTile,
    second_of_week: u32,
    start_node_index: u32,
    has_junction_name: bool,
    start_tile: Option<&GraphTile>,
    restrictions_index: Option<u32>,
    local_time: u64,
    tz_index: u32,
) -> LegEdge {
    let idx = edge.id();
    let mut trip_edge = LegEdge::default();

    let edgeinfo = graphtile.edge_info(directededge);

    if controller.enabled(Attribute::EdgeNames) {
        if let Some(edgeinfo) = edgeinfo {
            trip_edge.names = edgeinfo.names.clone();
        }
    }

    // Posted signage, partitioned by family.
    let mut sign_block = SignBlock::default();
    if directededge.has_sign {
        for sign in graphtile.signs(idx) {
            if let Some((target, attribute)) = sign_target(&mut sign_block, sign) {
                if controller.enabled(attribute) {
                    target.push(StreetName::new(sign.text.clone(), sign.is_route_number));
                }
            }
        }
    }

    // Junction names hang off the start node rather than the edge.
    if has_junction_name {
        if let Some(start_tile) = start_tile {
            for sign in start_tile.signs_for_node(start_node_index) {
                if sign.sign_type == SignType::JunctionName
                    && controller.enabled(Attribute::EdgeSignJunctionName)
                {
                    sign_block
                        .junction_names
                        .push(StreetName::new(sign.text.clone(), sign.is_route_number));
                }
            }
        }
    }
    if !sign_block.is_empty() {
        trip_edge.sign = Some(sign_block);
    }

    if directededge.has_turn_lanes && controller.enabled(Attribute::EdgeTurnLanes) {
        trip_edge.turn_lanes = graphtile.turn_lanes(idx);
    }

    if controller.enabled(Attribute::EdgeRoadClass) {
        trip_edge.road_class = Some(directededge.road_class);
    }

    if controller.enabled(Attribute::EdgeSpeed) {
        let secs = costing
            .edge_cost(directededge, graphtile, second_of_week)
            .secs;
        trip_edge.speed = Some(directededge.length as f64 / secs * 3.6);
    }

    let access_mask = match mode {
        TravelMode::Bicycle => access::BICYCLE,
        TravelMode::Drive => access::AUTO,
        TravelMode::Pedestrian | TravelMode::Transit => access::PEDESTRIAN,
    };

    if controller.enabled(Attribute::EdgeTraversability) {
        let forward_allowed = directededge.forward_access & access_mask != 0;
        let reverse_allowed = directededge.reverse_access & access_mask != 0;
        // When the edge is traversed against its nominal direction, forward
        // and backward swap.
        trip_edge.traversability = Some(match (forward_allowed, reverse_allowed) {
            (true, true) => Traversability::Both,
            (false, false) => Traversability::None,
            (true, false) if directededge.forward => Traversability::Forward,
            (true, false) => Traversability::Backward,
            (false, true) if directededge.forward => Traversability::Backward,
            (false, true) => Traversability::Forward,
        });
    }

    if directededge.has_lane_connectivity && controller.enabled(Attribute::EdgeLaneConnectivity) {
        let way_id = edgeinfo.map_or(0, |info| info.way_id);
        for lane in graphtile.lane_connectivities(idx) {
            trip_edge.lane_connectivity.push(lane.clone());
            trace!(
                way_id,
                from_way_id = lane.from_way_id,
                from_lanes = %lane.from_lanes,
                to_lanes = %lane.to_lanes,
                "lane connectivity"
            );

            if directededge.has_access_restriction {
                analyze_lane_restrictions(graphtile, idx, &lane.to_lanes, costing, local_time, tz_index);
            }
        }
    }

    if directededge.has_end_restriction {
        analyze_end_restrictions(graphtile, idx, costing, local_time, tz_index);
    }

    if directededge.has_access_restriction {
        if let Some(restrictions_index) = restrictions_index {
            let restrictions = graphtile.get_access_restrictions(idx, costing.access_mode());
            if let Some(restriction) = restrictions.get(restrictions_index as usize) {
                trip_edge.restriction_type = Some(restriction.restriction_type);
            }
        }
    }
    trip_edge.has_time_restrictions = restrictions_index.is_some();

    if controller.enabled(Attribute::EdgeUse) {
        trip_edge.use_type = Some(directededge.use_type);
    }

    if directededge.toll && controller.enabled(Attribute::EdgeToll) {
        trip_edge.toll = true;
    }
    if directededge.unpaved && controller.enabled(Attribute::EdgeUnpaved) {
        trip_edge.unpaved = true;
    }
    if directededge.tunnel && controller.enabled(Attribute::EdgeTunnel) {
        trip_edge.tunnel = true;
    }
    if directededge.bridge && controller.enabled(Attribute::EdgeBridge) {
        trip_edge.bridge = true;
    }
    if directededge.roundabout && controller.enabled(Attribute::EdgeRoundabout) {
        trip_edge.roundabout = true;
    }
    if directededge.internal_intersection
        && controller.enabled(Attribute::EdgeInternalIntersection)
    {
        trip_edge.internal_intersection = true;
    }

    if controller.enabled(Attribute::EdgeDriveOnRight) {
        trip_edge.drive_on_right = Some(drive_on_right);
    }

    if controller.enabled(Attribute::EdgeSurface) {
        trip_edge.surface = Some(directededge.surface);
    }

    if directededge.destination_only && controller.enabled(Attribute::EdgeDestinationOnly) {
        trip_edge.destination_only = true;
    }

    // Mode and its flavor; bicycles walk on stairs and dismount sections.
    match mode {
        TravelMode::Bicycle => {
            if directededge.dismount || directededge.use_type == EdgeUse::Steps {
                if controller.enabled(Attribute::EdgeTravelMode) {
                    trip_edge.travel_mode = Some(LegTravelMode::Pedestrian);
                }
                if controller.enabled(Attribute::EdgePedestrianType) {
                    trip_edge.pedestrian_type = Some(PedestrianType::Foot);
                }
            } else {
                if controller.enabled(Attribute::EdgeTravelMode) {
                    trip_edge.travel_mode = Some(LegTravelMode::Bicycle);
                }
                if controller.enabled(Attribute::EdgeBicycleType) {
                    trip_edge.bicycle_type = Some(bicycle_type_from(travel_type));
                }
            }
        }
        TravelMode::Drive => {
            if controller.enabled(Attribute::EdgeTravelMode) {
                trip_edge.travel_mode = Some(LegTravelMode::Drive);
            }
            if controller.enabled(Attribute::EdgeVehicleType) {
                trip_edge.vehicle_type = Some(vehicle_type_from(travel_type));
            }
        }
        TravelMode::Pedestrian => {
            if controller.enabled(Attribute::EdgeTravelMode) {
                trip_edge.travel_mode = Some(LegTravelMode::Pedestrian);
            }
            if controller.enabled(Attribute::EdgePedestrianType) {
                trip_edge.pedestrian_type = Some(pedestrian_type_from(travel_type));
            }
        }
        TravelMode::Transit => {
            if controller.enabled(Attribute::EdgeTravelMode) {
                trip_edge.travel_mode = Some(LegTravelMode::Transit);
            }
        }
    }

    if controller.enabled(Attribute::EdgeId) {
        trip_edge.id = Some(edge.value());
    }

    if controller.enabled(Attribute::EdgeWayId) {
        trip_edge.way_id = Some(edgeinfo.map_or(0, |info| info.way_id));
    }

    if controller.enabled(Attribute::EdgeWeightedGrade) {
        trip_edge.weighted_grade = Some((directededge.weighted_grade as f32 - 6.0) / 0.6);
    }

    // Grade and elevation fall back to the sentinel when the tile has no
    // elevation data.
    if controller.enabled(Attribute::EdgeMaxUpwardGrade) {
        trip_edge.max_upward_grade = Some(if graphtile.header.has_elevation {
            directededge.max_up_slope
        } else {
            NO_ELEVATION_DATA
        });
    }
    if controller.enabled(Attribute::EdgeMaxDownwardGrade) {
        trip_edge.max_downward_grade = Some(if graphtile.header.has_elevation {
            directededge.max_down_slope
        } else {
            NO_ELEVATION_DATA
        });
    }
    if controller.enabled(Attribute::EdgeMeanElevation) {
        trip_edge.mean_elevation = Some(if graphtile.header.has_elevation {
            edgeinfo.map_or(NO_ELEVATION_DATA, |info| info.mean_elevation)
        } else {
            NO_ELEVATION_DATA
        });
    }

    if controller.enabled(Attribute::EdgeLaneCount) {
        trip_edge.lane_count = Some(directededge.lane_count);
    }

    if directededge.cycle_lane != CycleLane::None && controller.enabled(Attribute::EdgeCycleLane) {
        trip_edge.cycle_lane = Some(directededge.cycle_lane);
    }

    if controller.enabled(Attribute::EdgeBicycleNetwork) {
        trip_edge.bicycle_network = Some(directededge.bike_network);
    }

    if controller.enabled(Attribute::EdgeSidewalk) {
        if directededge.sidewalk_left && directededge.sidewalk_right {
            trip_edge.sidewalk = Some(Sidewalk::BothSides);
        } else if directededge.sidewalk_left {
            trip_edge.sidewalk = Some(Sidewalk::Left);
        } else if directededge.sidewalk_right {
            trip_edge.sidewalk = Some(Sidewalk::Right);
        }
    }

    if controller.enabled(Attribute::EdgeDensity) {
        trip_edge.density = Some(directededge.density);
    }

    if controller.enabled(Attribute::EdgeSpeedLimit) {
        trip_edge.speed_limit = Some(edgeinfo.map_or(0, |info| info.speed_limit));
    }

    if controller.enabled(Attribute::EdgeDefaultSpeed) {
        trip_edge.default_speed = Some(directededge.speed);
    }

    if controller.enabled(Attribute::EdgeTruckSpeed) {
        trip_edge.truck_speed = Some(directededge.truck_speed);
    }

    if directededge.truck_route && controller.enabled(Attribute::EdgeTruckRoute) {
        trip_edge.truck_route = true;
    }

    if trip_id != 0 && directededge.is_transit_line() {
        trip_edge.transit_route_info = Some(build_transit_route_info(
            controller,
            graphtile,
            directededge,
            trip_id,
            block_id,
            second_of_week,
        ));
        if controller.enabled(Attribute::EdgeTransitType) {
            if let Some(route) = graphtile
                .get_transit_departure(
                    directededge.line_id,
                    trip_id,
                    second_of_week % SECONDS_PER_DAY,
                )
                .and_then(|d| graphtile.get_transit_route(d.route_index))
            {
                trip_edge.transit_type = Some(route.route_type);
            }
        }
    }

    trip_edge
}

/// Transit route context for a rail/bus edge. Missing sub-records degrade
/// silently, leaving their fields unset.
fn build_transit_route_info(
    controller: &AttributesController,
    graphtile: &GraphTile,
    directededge: &DirectedEdge,
    trip_id: u32,
    block_id: u32,
    second_of_week: u32,
) -> TransitRouteInfo {
    let mut info = TransitRouteInfo::default();

    if controller.enabled(Attribute::EdgeTransitRouteInfoBlockId) {
        info.block_id = Some(block_id);
    }
    if controller.enabled(Attribute::EdgeTransitRouteInfoTripId) {
        info.trip_id = Some(trip_id);
    }

    let departure = graphtile.get_transit_departure(
        directededge.line_id,
        trip_id,
        second_of_week % SECONDS_PER_DAY,
    );
    let Some(departure) = departure else {
        return info;
    };

    if controller.enabled(Attribute::EdgeTransitRouteInfoHeadsign) && !departure.headsign.is_empty()
    {
        info.headsign = Some(departure.headsign.clone());
    }

    let Some(route) = graphtile.get_transit_route(departure.route_index) else {
        return info;
    };

    if controller.enabled(Attribute::EdgeTransitRouteInfoOnestopId) && !route.one_stop_id.is_empty()
    {
        info.onestop_id = Some(route.one_stop_id.clone());
    }
    if controller.enabled(Attribute::EdgeTransitRouteInfoShortName) && !route.short_name.is_empty()
    {
        info.short_name = Some(route.short_name.clone());
    }
    if controller.enabled(Attribute::EdgeTransitRouteInfoLongName) && !route.long_name.is_empty() {
        info.long_name = Some(route.long_name.clone());
    }
    if controller.enabled(Attribute::EdgeTransitRouteInfoColor) {
        info.color = Some(route.color);
    }
    if controller.enabled(Attribute::EdgeTransitRouteInfoTextColor) {
        info.text_color = Some(route.text_color);
    }
    if controller.enabled(Attribute::EdgeTransitRouteInfoDescription)
        && !route.description.is_empty()
    {
        info.description = Some(route.description.clone());
    }
    if controller.enabled(Attribute::EdgeTransitRouteInfoOperatorOnestopId)
        && !route.operator_one_stop_id.is_empty()
    {
        info.operator_onestop_id = Some(route.operator_one_stop_id.clone());
    }
    if controller.enabled(Attribute::EdgeTransitRouteInfoOperatorName)
        && !route.operator_name.is_empty()
    {
        info.operator_name = Some(route.operator_name.clone());
    }
    if controller.enabled(Attribute::EdgeTransitRouteInfoOperatorUrl)
        && !route.operator_url.is_empty()
    {
        info.operator_url = Some(route.operator_url.clone());
    }

    info
}

/// Cross-references an edge's lane connectivity with its lane-scoped access
/// restrictions. Trace-level diagnostics only.
fn analyze_lane_restrictions(
    graphtile: &GraphTile,
    edge_index: u32,
    to_lanes: &str,
    costing: &dyn Costing,
    local_time: u64,
    tz_index: u32,
) {
    for restriction in graphtile.get_access_restrictions(edge_index, access::ALL) {
        for token in to_lanes.split('|') {
            let Ok(lane) = token.parse::<u32>() else {
                continue;
            };
            let applies = lane < 64 && restriction.lanes & (1u64 << lane) != 0;

            match restriction.restriction_type {
                AccessRestrictionType::CenterLane if applies => {
                    trace!(lane, "center turn lane");
                    break;
                }
                AccessRestrictionType::LaneTimedAllowed
                | AccessRestrictionType::LaneTimedDenied => {
                    trace!(lane, applies, "timed lane access restriction");
                    if !applies {
                        continue;
                    }
                    let affects_mode = restriction.modes & costing.access_mode() != 0;
                    let allowed = if local_time != 0 && tz_index != 0 {
                        let active = TimeZoneDb::global()
                            .from_index(tz_index)
                            .is_some_and(|tz| restriction.time_domain().is_active(local_time, tz));
                        if !active {
                            true
                        } else if restriction.restriction_type
                            == AccessRestrictionType::LaneTimedAllowed
                        {
                            affects_mode
                        } else {
                            !affects_mode
                        }
                    } else if restriction.restriction_type
                        == AccessRestrictionType::LaneTimedAllowed
                    {
                        affects_mode
                    } else {
                        !affects_mode
                    };
                    trace!(lane, allowed, "timed lane restriction evaluation");
                }
                AccessRestrictionType::LaneAllowed | AccessRestrictionType::LaneDenied => {
                    trace!(
                        lane,
                        applies,
                        modes = restriction.modes,
                        "lane access restriction"
                    );
                }
                _ => {}
            }
        }
    }
}

/// Walks complex lane restrictions anchored at the end of the edge,
/// evaluating timed variants under the current costing. Trace-level only.
fn analyze_end_restrictions(
    graphtile: &GraphTile,
    edge_index: u32,
    costing: &dyn Costing,
    local_time: u64,
    tz_index: u32,
) {
    for restriction in graphtile.get_restrictions(edge_index, access::ALL) {
        match restriction.restriction_type {
            RestrictionType::ComplexLane => {
                trace!("complex lane restriction");
            }
            RestrictionType::LaneRestriction => {
                let affects_mode = restriction.modes & costing.access_mode() != 0;
                let restricted = if local_time != 0 && tz_index != 0 {
                    affects_mode
                        && restriction.time_domain.is_some_and(|td| {
                            TimeZoneDb::global()
                                .from_index(tz_index)
                                .is_some_and(|tz| td.is_active(local_time, tz))
                        })
                } else {
                    restriction.has_time_domain() && affects_mode
                };
                trace!(restricted, "lane restriction evaluation");
            }
            _ => continue,
        }

        let mut vias = Vec::new();
        restriction.walk_vias(|via| {
            vias.push(*via);
            true
        });
        for via in vias {
            trace!(?via, "restriction via edge");
        }
    }
}
