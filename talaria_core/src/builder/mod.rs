//! Leg construction: walks a computed path, assembles edge and node records,
//! stitches the shape, and replays recostings over the finished leg.

mod admins;
mod intersecting;
mod locations;
mod recost;
mod shape;
mod transit;
mod trip_edge;

pub use recost::{accumulate_recosting_info_forward, recost_forward, RecostLabel};
pub use shape::{set_shape_attributes, trim_shape};

use fxhash::FxHashMap;
use tracing::debug;

use crate::constants::{CURRENT_FLOW_MASK, KM_PER_METER};
use crate::controller::{Attribute, AttributesController, Category};
use crate::costing::{Costing, ModeCosting, TravelMode};
use crate::error::LegError;
use crate::graph::{
    DirectedEdge, EdgeUse, GraphId, GraphReader, IntersectionType, NodeType, RoadClass,
};
use crate::latlng::{heading_along_polyline, heading_at_end_of_polyline, LatLng};
use crate::leg::{BikeShareInfo, LegEdge, LegNode, ShapeAttributes, TripLeg};
use crate::leg::BoundingBox;
use crate::location::{Location, SideOfStreet};
use crate::path::PathStep;
use crate::polyline;
use crate::time_info::{TimeInfo, TimeZoneDb};

use admins::{assign_admins, AdminInterner};
use intersecting::add_trip_intersecting_edge;
use locations::copy_locations;
use transit::{add_transit_nodes, TransitState};
use trip_edge::build_trip_edge;

/// Instruction to cut an edge's shape at `distance_along` and pin the cut to
/// `vertex`, used to inject discontinuities mid-route.
#[derive(Copy, Clone, Debug)]
pub struct EdgeTrimmingInfo {
    pub trim: bool,
    pub distance_along: f32,
    pub vertex: LatLng,
}

/// Trimming instructions keyed by zero-based edge index within the path.
pub type EdgeTrimming = FxHashMap<usize, (EdgeTrimmingInfo, EdgeTrimmingInfo)>;

/// Request-level options the builder cares about.
#[derive(Default)]
pub struct Options<'a> {
    /// Extra costings to replay over the finished leg.
    pub recostings: Vec<&'a dyn Costing>,
}

fn offset_for_heading(road_class: RoadClass, use_type: EdgeUse) -> f64 {
    let offset = match road_class {
        RoadClass::Motorway | RoadClass::Trunk | RoadClass::Primary => 30.0,
        RoadClass::Secondary | RoadClass::Tertiary => 25.0,
        _ => 15.0,
    };
    match use_type {
        EdgeUse::Ramp
        | EdgeUse::TurnChannel
        | EdgeUse::Driveway
        | EdgeUse::Alley
        | EdgeUse::Cycleway
        | EdgeUse::Footway
        | EdgeUse::Sidewalk
        | EdgeUse::Path => 10.0,
        _ => offset,
    }
}

/// Begin/end heading over the edge's slice of the leg shape. Must run after
/// the edge's shape has been appended.
fn set_headings(
    trip_edge: &mut LegEdge,
    controller: &AttributesController,
    edge: &DirectedEdge,
    shape: &[LatLng],
    begin_index: usize,
) {
    if !controller.enabled(Attribute::EdgeBeginHeading)
        && !controller.enabled(Attribute::EdgeEndHeading)
    {
        return;
    }
    let offset = offset_for_heading(edge.road_class, edge.use_type);
    if controller.enabled(Attribute::EdgeBeginHeading) {
        trip_edge.begin_heading =
            Some(heading_along_polyline(shape, offset, begin_index, shape.len() - 1).round() as u32);
    }
    if controller.enabled(Attribute::EdgeEndHeading) {
        trip_edge.end_heading = Some(
            heading_at_end_of_polyline(shape, offset, begin_index, shape.len() - 1).round() as u32,
        );
    }
}

/// Bike-share context only makes sense when both legs of the mode switch
/// (walking and riding) have costings.
fn add_bss_node(trip_node: &mut LegNode, node_type: NodeType, mode_costing: &ModeCosting) {
    if node_type != NodeType::BikeShare {
        return;
    }
    let pedestrian = mode_costing[TravelMode::Pedestrian.index()];
    let bicycle = mode_costing[TravelMode::Bicycle.index()];
    if let (Some(pedestrian), Some(bicycle)) = (pedestrian, bicycle) {
        trip_node.bss_info = Some(BikeShareInfo {
            rent_cost_secs: Some(pedestrian.bss_cost().secs),
            return_cost_secs: Some(bicycle.bss_cost().secs),
            ..Default::default()
        });
    }
}

/// Finds the candidate of `location` that lies on `edge_id` and returns its
/// traversal fraction, side of street, and snapped point.
fn matched_candidate(
    location: &Location,
    edge_id: GraphId,
) -> (f32, SideOfStreet, Option<LatLng>) {
    for candidate in &location.candidates {
        if candidate.edge_id == edge_id {
            return (
                candidate.percent_along,
                candidate.side_of_street,
                Some(candidate.ll),
            );
        }
    }
    (0.0, SideOfStreet::None, None)
}

pub struct LegBuilder;

impl LegBuilder {
    /// Materialises `path` into `leg`. Origin, throughs, and destination are
    /// pruned in place to the edges the path actually uses.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        options: &Options,
        controller: &AttributesController,
        reader: &dyn GraphReader,
        mode_costing: &ModeCosting,
        path: &[PathStep],
        origin: &mut Location,
        dest: &mut Location,
        through_locations: &mut [Location],
        leg: &mut TripLeg,
        interrupt: Option<&dyn Fn() -> bool>,
        edge_trimming: Option<&EdgeTrimming>,
    ) -> Result<(), LegError> {
        // The interrupt is consulted exactly once, before any leg state.
        if let Some(interrupt) = interrupt {
            if interrupt() {
                return Err(LegError::Interrupted);
            }
        }
        if path.is_empty() {
            return Err(LegError::EmptyPath);
        }

        copy_locations(leg, origin, through_locations, dest, path);

        // Recover the first edge's begin node via its opposing twin.
        let first_edge_id = path[0].edge_id;
        let first_edge = reader
            .directed_edge(first_edge_id)
            .ok_or(LegError::MissingTile(first_edge_id))?;
        let first_tile = reader
            .get_tile(first_edge.end_node)
            .ok_or(LegError::MissingTile(first_edge.end_node))?;
        let first_node = first_tile
            .node(first_edge.end_node)
            .ok_or(LegError::MissingNode(first_edge.end_node))?;
        let mut startnode = first_tile
            .directed_edge_at(first_node.edge_index + first_edge.opposing_index)
            .ok_or(LegError::MissingEdge(first_edge_id))?
            .end_node;

        // Partial first/last edge and projected positions.
        let (mut start_pct, start_sos, start_vrt) = matched_candidate(origin, first_edge_id);
        let last_edge_id = path[path.len() - 1].edge_id;
        let (mut end_pct, end_sos, end_vrt) = matched_candidate(dest, last_edge_id);
        if end_vrt.is_none() {
            end_pct = 1.0;
        }

        {
            let leg_origin = leg.locations.first_mut().expect("origin was copied");
            leg_origin.projected_ll = start_vrt;
            if start_sos != SideOfStreet::None {
                leg_origin.side_of_street = start_sos;
            }
            let leg_dest = leg.locations.last_mut().expect("dest was copied");
            leg_dest.projected_ll = end_vrt;
            if end_sos != SideOfStreet::None {
                leg_dest.side_of_street = end_sos;
            }
        }

        let start_node_tz = reader.node_info(startnode).map_or(0, |node| node.timezone);
        let origin_time_info = match &origin.date_time {
            Some(date_time) => TimeInfo::from_date_time(date_time, start_node_tz),
            None => TimeInfo::invalid(),
        };

        let travel_types: [u8; TravelMode::COUNT] =
            std::array::from_fn(|i| mode_costing[i].map_or(0, |costing| costing.travel_type()));

        let mut interner = AdminInterner::new();

        if controller.category_enabled(Category::ShapeAttributes) {
            leg.shape_attributes = Some(ShapeAttributes::default());
        }

        // Single-edge legs trim both ends of one shape and are done.
        if path.len() == 1 {
            return Self::build_single_edge(
                options,
                controller,
                reader,
                mode_costing,
                path,
                leg,
                startnode,
                start_pct,
                start_vrt,
                end_pct,
                end_vrt,
                &origin_time_info,
                travel_types,
                &mut interner,
            );
        }

        let mut is_first_edge = true;
        let mut prior_opp_local_index = u32::MAX;
        let mut trip_shape: Vec<LatLng> = Vec::new();
        let mut osm_changeset = 0u64;
        let mut prev_de: Option<&DirectedEdge> = None;
        let mut transit_state = TransitState::new();

        for (edge_index, step) in path.iter().enumerate() {
            let edge = step.edge_id;
            let trip_id = step.trip_id;
            let graphtile = reader.get_tile(edge).ok_or(LegError::MissingTile(edge))?;
            let directededge = graphtile
                .directed_edge(edge)
                .ok_or(LegError::MissingEdge(edge))?;
            let mode = step.mode;
            let travel_type = travel_types[mode.index()];
            let costing = mode_costing[mode.index()].ok_or(LegError::MissingCosting)?;

            let start_tile = reader
                .get_tile(startnode)
                .ok_or(LegError::MissingTile(startnode))?;
            let node = start_tile
                .node(startnode)
                .ok_or(LegError::MissingNode(startnode))?;

            if osm_changeset == 0 && controller.enabled(Attribute::OsmChangeset) {
                osm_changeset = start_tile.header.dataset_id;
            }

            // Local time at this node; recomputed from the origin so a
            // timezone change anywhere along the path is reflected.
            let elapsed_at_node = if is_first_edge {
                0.0
            } else {
                path[edge_index - 1].elapsed_cost.secs
            };
            let time_info = origin_time_info.forward(elapsed_at_node, node.timezone);

            let mut trip_node = LegNode::default();

            if controller.enabled(Attribute::NodeType) {
                trip_node.node_type = Some(node.node_type);
            }
            if node.intersection == IntersectionType::Fork
                && controller.enabled(Attribute::NodeFork)
            {
                trip_node.fork = true;
            }
            if controller.enabled(Attribute::NodeElapsedTime) {
                trip_node.cost.elapsed_cost = if is_first_edge {
                    Default::default()
                } else {
                    path[edge_index - 1].elapsed_cost
                };
            }
            if controller.enabled(Attribute::NodeAdminIndex) {
                let admin = start_tile.admin(node.admin_index).cloned().unwrap_or_default();
                trip_node.admin_index = Some(interner.index_of(&admin));
            }
            if controller.enabled(Attribute::NodeTimeZone) {
                trip_node.time_zone = TimeZoneDb::global()
                    .name(node.timezone)
                    .map(str::to_owned);
            }
            if controller.enabled(Attribute::NodeTransitionTime) {
                trip_node.cost.transition_cost = step.transition_cost;
            }

            add_bss_node(&mut trip_node, node.node_type, mode_costing);
            add_transit_nodes(&mut trip_node, node, start_tile, controller);

            if node.is_transit() {
                transit_state.project_platform(
                    controller,
                    reader,
                    start_tile,
                    node,
                    graphtile,
                    directededge,
                    trip_id,
                    origin.date_time.as_deref(),
                    &time_info,
                    &mut trip_node,
                );
            }

            let mut trip_edge = build_trip_edge(
                controller,
                edge,
                trip_id,
                transit_state.block_id,
                mode,
                travel_type,
                costing,
                directededge,
                node.drive_on_right,
                graphtile,
                time_info.second_of_week,
                startnode.id(),
                node.named_intersection,
                Some(start_tile),
                step.restriction_index,
                time_info.local_time,
                node.timezone,
            );

            // Stitch this edge's shape onto the running leg shape.
            let edgeinfo = graphtile
                .edge_info(directededge)
                .ok_or(LegError::MissingEdge(edge))?;
            let mut begin_index = if is_first_edge { 0 } else { trip_shape.len() - 1 };
            let is_last_edge = edge_index == path.len() - 1;
            let mut trim_start_pct = if is_first_edge { start_pct } else { 0.0 };
            let mut trim_end_pct = if is_last_edge { end_pct } else { 1.0 };

            if let Some((begin_info, end_info)) =
                edge_trimming.and_then(|trimming| trimming.get(&edge_index))
            {
                // A route discontinuity crosses this edge.
                let mut begin_info = *begin_info;
                let mut end_info = *end_info;
                let mut edge_shape = edgeinfo.shape_oriented(directededge.forward);

                if is_first_edge && !begin_info.trim {
                    begin_info.trim = true;
                    begin_info.distance_along = start_pct;
                    begin_info.vertex = start_vrt.unwrap_or(edge_shape[0]);
                }
                if is_last_edge && !end_info.trim {
                    end_info.trim = true;
                    end_info.distance_along = end_pct;
                    end_info.vertex = end_vrt.unwrap_or(*edge_shape.last().unwrap());
                }

                trim_start_pct = begin_info.distance_along;
                trim_end_pct = end_info.distance_along;

                let edge_length = directededge.length as f64;
                trim_shape(
                    begin_info.distance_along as f64 * edge_length,
                    begin_info.vertex,
                    end_info.distance_along as f64 * edge_length,
                    end_info.vertex,
                    &mut edge_shape,
                );
                let skip = usize::from(!(begin_info.trim || is_first_edge));
                trip_shape.extend(edge_shape.into_iter().skip(skip));

                // A trimmed begin breaks contiguity with the previous edge.
                if begin_info.trim && !is_first_edge {
                    begin_index += 1;
                }
            } else if is_first_edge || is_last_edge {
                let mut edge_shape = edgeinfo.shape_oriented(directededge.forward);
                let total = directededge.length as f64;
                if is_first_edge {
                    let back = *edge_shape.last().unwrap();
                    let vertex = start_vrt.unwrap_or(edge_shape[0]);
                    trim_shape(start_pct as f64 * total, vertex, total, back, &mut edge_shape);
                } else {
                    let front = edge_shape[0];
                    let vertex = end_vrt.unwrap_or(*edge_shape.last().unwrap());
                    trim_shape(0.0, front, end_pct as f64 * total, vertex, &mut edge_shape);
                }
                trip_shape.extend(edge_shape.into_iter().skip(usize::from(is_last_edge)));
            } else if directededge.forward {
                trip_shape.extend(edgeinfo.shape.iter().skip(1).copied());
            } else {
                trip_shape.extend(edgeinfo.shape.iter().rev().skip(1).copied());
            }

            if controller.enabled(Attribute::EdgeLength) {
                let km = (directededge.length as f32
                    * KM_PER_METER
                    * (trim_end_pct - trim_start_pct))
                    .max(0.001);
                trip_edge.length_km = Some(km);
            }

            let mut edge_seconds = step.elapsed_cost.secs - step.transition_cost.secs;
            if edge_index > 0 {
                edge_seconds -= path[edge_index - 1].elapsed_cost.secs;
            }
            let cut_for_traffic = costing.flow_mask() & CURRENT_FLOW_MASK != 0
                && !directededge.is_transit_line();
            set_shape_attributes(
                controller,
                graphtile,
                directededge,
                edge.id(),
                &mut trip_shape,
                begin_index,
                leg,
                trim_start_pct as f64,
                trim_end_pct as f64,
                edge_seconds,
                cut_for_traffic,
            );

            if controller.enabled(Attribute::EdgeBeginShapeIndex) {
                trip_edge.begin_shape_index = Some(begin_index);
            }
            if controller.enabled(Attribute::EdgeEndShapeIndex) {
                trip_edge.end_shape_index = Some(trip_shape.len() - 1);
            }
            set_headings(&mut trip_edge, controller, directededge, &trip_shape, begin_index);

            // Intersecting edges at this node, across hierarchy levels.
            // Skip shortcuts, the previous edge's twin, the path edge itself,
            // and anything the path edge supersedes.
            let begin = node.edge_index as usize;
            let end = begin + node.edge_count as usize;
            for de in start_tile.directed_edges.get(begin..end).unwrap_or(&[]) {
                if de.is_shortcut
                    || de.local_edge_index == prior_opp_local_index
                    || de.local_edge_index == directededge.local_edge_index
                    || (directededge.is_shortcut
                        && directededge.shortcut_mask & de.superseded_mask != 0)
                {
                    continue;
                }
                add_trip_intersecting_edge(
                    controller,
                    directededge,
                    prev_de,
                    de.local_edge_index,
                    node,
                    &mut trip_node,
                    de,
                );
            }
            for transition in start_tile.transitions(node) {
                let Some(endtile) = reader.get_tile(transition.end_node) else {
                    continue;
                };
                let Some(nodeinfo2) = endtile.node(transition.end_node) else {
                    continue;
                };
                let begin = nodeinfo2.edge_index as usize;
                let end = begin + nodeinfo2.edge_count as usize;
                for de2 in endtile.directed_edges.get(begin..end).unwrap_or(&[]) {
                    if de2.is_shortcut
                        || de2.local_edge_index == prior_opp_local_index
                        || de2.local_edge_index == directededge.local_edge_index
                    {
                        continue;
                    }
                    add_trip_intersecting_edge(
                        controller,
                        directededge,
                        prev_de,
                        de2.local_edge_index,
                        nodeinfo2,
                        &mut trip_node,
                        de2,
                    );
                }
            }

            trip_node.edge = Some(trip_edge);
            leg.nodes.push(trip_node);

            // Bookkeeping for the next iteration.
            startnode = directededge.end_node;
            is_first_edge = false;

            if !directededge.is_transit_line() {
                let next_tile = if directededge.leaves_tile {
                    reader.get_tile(directededge.end_node)
                } else {
                    Some(graphtile)
                };
                let Some(next_tile) = next_tile else {
                    // End tile is missing; leave the previous-edge context
                    // and opposing index as they were.
                    debug!(edge = ?directededge.end_node, "missing end tile, keeping prior context");
                    continue;
                };
                prev_de = next_tile
                    .opposing_edge_id(directededge)
                    .and_then(|opp| next_tile.directed_edge(opp));
            }
            prior_opp_local_index = directededge.opposing_local_index;
        }

        // Terminal node.
        let mut last_node = LegNode::default();
        if controller.enabled(Attribute::NodeAdminIndex) {
            match reader
                .get_tile(startnode)
                .and_then(|tile| Some((tile, tile.node(startnode)?)))
            {
                Some((tile, node)) => {
                    let admin = tile.admin(node.admin_index).cloned().unwrap_or_default();
                    last_node.admin_index = Some(interner.index_of(&admin));
                }
                None => last_node.admin_index = Some(0),
            }
        }
        if controller.enabled(Attribute::NodeElapsedTime) {
            last_node.cost.elapsed_cost = path[path.len() - 1].elapsed_cost;
        }
        // No transition out of the final node.
        leg.nodes.push(last_node);

        assign_admins(controller, leg, interner.into_list());

        leg.bbox = Some(BoundingBox::of(&trip_shape));
        if controller.enabled(Attribute::Shape) {
            leg.shape = Some(polyline::encode(&trip_shape));
        }
        if osm_changeset != 0 && controller.enabled(Attribute::OsmChangeset) {
            leg.osm_changeset = Some(osm_changeset);
        }

        accumulate_recosting_info_forward(
            &options.recostings,
            start_pct,
            end_pct,
            &origin_time_info,
            reader,
            leg,
        );

        Ok(())
    }

    /// The single-step special case: both trim percentages land on the same
    /// edge, and traversal against the nominal direction swaps to the
    /// opposing edge and flips the destination side of street.
    #[allow(clippy::too_many_arguments)]
    fn build_single_edge(
        options: &Options,
        controller: &AttributesController,
        reader: &dyn GraphReader,
        mode_costing: &ModeCosting,
        path: &[PathStep],
        leg: &mut TripLeg,
        startnode: GraphId,
        mut start_pct: f32,
        start_vrt: Option<LatLng>,
        mut end_pct: f32,
        end_vrt: Option<LatLng>,
        origin_time_info: &TimeInfo,
        travel_types: [u8; TravelMode::COUNT],
        interner: &mut AdminInterner,
    ) -> Result<(), LegError> {
        let step = &path[0];
        let edge_id = step.edge_id;
        let tile = reader
            .get_tile(edge_id)
            .ok_or(LegError::MissingTile(edge_id))?;
        let mut edge = tile
            .directed_edge(edge_id)
            .ok_or(LegError::MissingEdge(edge_id))?;

        // Orient the shape to the traversal direction rather than the edge's
        // nominal one.
        let edgeinfo = tile.edge_info(edge).ok_or(LegError::MissingEdge(edge_id))?;
        let mut shape = edgeinfo.shape_oriented(edge.forward == (start_pct < end_pct));

        if start_pct > end_pct {
            start_pct = 1.0 - start_pct;
            end_pct = 1.0 - end_pct;
            edge = reader
                .get_opposing_edge(edge_id)
                .ok_or(LegError::MissingEdge(edge_id))?;
            let leg_dest = leg.locations.last_mut().expect("dest was copied");
            leg_dest.side_of_street = leg_dest.side_of_street.flipped();
        }

        let total = edge.length as f64;
        let start_vertex = start_vrt.unwrap_or(shape[0]);
        let end_vertex = end_vrt.unwrap_or(*shape.last().unwrap());
        trim_shape(
            start_pct as f64 * total,
            start_vertex,
            end_pct as f64 * total,
            end_vertex,
            &mut shape,
        );

        let drive_on_right = reader
            .get_opposing_edge(edge_id)
            .and_then(|opposing| reader.node_info(opposing.end_node))
            .is_none_or(|node| node.drive_on_right);

        let costing = mode_costing[step.mode.index()].ok_or(LegError::MissingCosting)?;
        let mut trip_node = LegNode::default();
        let mut trip_edge = build_trip_edge(
            controller,
            edge_id,
            step.trip_id,
            0,
            step.mode,
            travel_types[step.mode.index()],
            costing,
            edge,
            drive_on_right,
            tile,
            origin_time_info.second_of_week,
            startnode.id(),
            false,
            None,
            step.restriction_index,
            0,
            0,
        );

        if controller.enabled(Attribute::EdgeLength) {
            let km = (edge.length as f32 * KM_PER_METER * (end_pct - start_pct).abs()).max(0.001);
            trip_edge.length_km = Some(km);
        }

        let edge_seconds = step.elapsed_cost.secs - step.transition_cost.secs;
        let cut_for_traffic =
            costing.flow_mask() & CURRENT_FLOW_MASK != 0 && !edge.is_transit_line();
        set_shape_attributes(
            controller,
            tile,
            edge,
            edge_id.id(),
            &mut shape,
            0,
            leg,
            start_pct as f64,
            end_pct as f64,
            edge_seconds,
            cut_for_traffic,
        );

        if controller.enabled(Attribute::EdgeBeginShapeIndex) {
            trip_edge.begin_shape_index = Some(0);
        }
        if controller.enabled(Attribute::EdgeEndShapeIndex) {
            trip_edge.end_shape_index = Some(shape.len() - 1);
        }
        set_headings(&mut trip_edge, controller, edge, &shape, 0);

        trip_node.edge = Some(trip_edge);
        leg.nodes.push(trip_node);

        let mut last_node = LegNode::default();
        if controller.enabled(Attribute::NodeElapsedTime) {
            last_node.cost.elapsed_cost = step.elapsed_cost;
        }
        if controller.enabled(Attribute::NodeAdminIndex) {
            match reader
                .get_tile(edge.end_node)
                .and_then(|end_tile| Some((end_tile, end_tile.node(edge.end_node)?)))
            {
                Some((end_tile, node)) => {
                    let admin = end_tile.admin(node.admin_index).cloned().unwrap_or_default();
                    last_node.admin_index = Some(interner.index_of(&admin));
                }
                None => last_node.admin_index = Some(0),
            }
        }
        leg.nodes.push(last_node);

        leg.bbox = Some(BoundingBox::of(&shape));
        if controller.enabled(Attribute::Shape) {
            leg.shape = Some(polyline::encode(&shape));
        }
        if controller.enabled(Attribute::OsmChangeset) {
            leg.osm_changeset = Some(tile.header.dataset_id);
        }

        assign_admins(controller, leg, std::mem::take(interner).into_list());

        accumulate_recosting_info_forward(
            &options.recostings,
            start_pct,
            end_pct,
            origin_time_info,
            reader,
            leg,
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeUse, TransitDeparture, TransitRoute, TransitSchedule, TransitStop, TransitType};
    use crate::latlng::polyline_length;
    use crate::leg::TransitPlatformType;
    use crate::location::PathEdgeCandidate;
    use crate::polyline;
    use crate::test_tiles::{
        chain_tile, forward_edge_id, node_id, node_latlng, reader_with, RejectingCosting,
        TestCosting, SEGMENT_LENGTH_M,
    };

    fn candidate(edge: GraphId, pct: f32, ll: LatLng, side: SideOfStreet) -> PathEdgeCandidate {
        PathEdgeCandidate {
            edge_id: edge,
            percent_along: pct,
            side_of_street: side,
            ll,
        }
    }

    fn location_on(edge: GraphId, pct: f32, ll: LatLng) -> Location {
        Location {
            candidates: vec![candidate(edge, pct, ll, SideOfStreet::None)],
            ..Location::at(ll)
        }
    }

    fn drive_step(edge: GraphId, elapsed: f64) -> PathStep {
        PathStep::new(edge, TravelMode::Drive, elapsed)
    }

    #[allow(clippy::too_many_arguments)]
    fn run_build(
        reader: &crate::graph::TileSet,
        path: &[PathStep],
        origin: &mut Location,
        dest: &mut Location,
        controller: &AttributesController,
        recostings: &[&dyn Costing],
        trimming: Option<&EdgeTrimming>,
        interrupt: Option<&dyn Fn() -> bool>,
    ) -> Result<TripLeg, LegError> {
        let costing = TestCosting;
        let mode_costing: ModeCosting = [Some(&costing); TravelMode::COUNT];
        let options = Options {
            recostings: recostings.to_vec(),
        };
        let mut leg = TripLeg::default();
        LegBuilder::build(
            &options,
            controller,
            reader,
            &mode_costing,
            path,
            origin,
            dest,
            &mut [],
            &mut leg,
            interrupt,
            trimming,
        )?;
        Ok(leg)
    }

    fn point_along_segment0(pct: f64) -> LatLng {
        node_latlng(0).point_along_segment(&node_latlng(1), pct)
    }

    #[test]
    fn trivial_leg_trims_both_ends() {
        let reader = reader_with(chain_tile(1));
        let edge = forward_edge_id(0);
        let mut origin = location_on(edge, 0.2, point_along_segment0(0.2));
        let mut dest = location_on(edge, 0.8, point_along_segment0(0.8));
        let path = [drive_step(edge, 10.0)];

        let leg = run_build(
            &reader,
            &path,
            &mut origin,
            &mut dest,
            &AttributesController::all(),
            &[],
            None,
            None,
        )
        .unwrap();

        assert_eq!(leg.nodes.len(), 2);
        assert_eq!(leg.edge_count(), 1);
        let edge_record = leg.edges().next().unwrap();
        let expected_km = SEGMENT_LENGTH_M as f32 * 0.001 * 0.6;
        assert!((edge_record.length_km.unwrap() - expected_km).abs() < 1e-4);
        assert_eq!(edge_record.begin_shape_index, Some(0));

        let shape = polyline::decode(leg.shape.as_ref().unwrap());
        assert_eq!(edge_record.end_shape_index, Some(shape.len() - 1));
        let trimmed = polyline_length(&shape);
        assert!((trimmed - SEGMENT_LENGTH_M as f64 * 0.6).abs() < 2.0, "{trimmed}");

        // One admin interned from the end node.
        assert_eq!(leg.admins.len(), 1);
        assert_eq!(leg.nodes[1].admin_index, Some(0));

        // Shape attribute vectors cover every decoded segment.
        let attributes = leg.shape_attributes.as_ref().unwrap();
        assert_eq!(attributes.time.len(), shape.len() - 1);
        assert_eq!(attributes.length.len(), shape.len() - 1);
        assert_eq!(attributes.speed.len(), shape.len() - 1);

        // Projected onto the retained candidate.
        assert_eq!(leg.locations[0].candidates.len(), 1);
        assert!(leg.locations[0].projected_ll.is_some());
    }

    #[test]
    fn reversed_trivial_leg_flips_side_of_street() {
        let reader = reader_with(chain_tile(1));
        let edge = forward_edge_id(0);
        let mut origin = location_on(edge, 0.8, point_along_segment0(0.8));
        let mut dest = Location {
            candidates: vec![candidate(
                edge,
                0.2,
                point_along_segment0(0.2),
                SideOfStreet::Left,
            )],
            ..Location::at(point_along_segment0(0.2))
        };
        let path = [drive_step(edge, 10.0)];

        let leg = run_build(
            &reader,
            &path,
            &mut origin,
            &mut dest,
            &AttributesController::all(),
            &[],
            None,
            None,
        )
        .unwrap();

        // Traversal runs against the nominal direction, so the shape runs
        // from the 80% point back to the 20% point.
        let shape = polyline::decode(leg.shape.as_ref().unwrap());
        assert!(shape.first().unwrap().lng > shape.last().unwrap().lng);

        assert_eq!(
            leg.locations.last().unwrap().side_of_street,
            SideOfStreet::Right
        );

        let edge_record = leg.edges().next().unwrap();
        let expected_km = SEGMENT_LENGTH_M as f32 * 0.001 * 0.6;
        assert!((edge_record.length_km.unwrap() - expected_km).abs() < 1e-4);
    }

    #[test]
    fn degenerate_trivial_leg_clamps_length() {
        let reader = reader_with(chain_tile(1));
        let edge = forward_edge_id(0);
        let midpoint = point_along_segment0(0.5);
        let mut origin = location_on(edge, 0.5, midpoint);
        let mut dest = location_on(edge, 0.5, midpoint);
        let path = [drive_step(edge, 10.0)];

        let leg = run_build(
            &reader,
            &path,
            &mut origin,
            &mut dest,
            &AttributesController::all(),
            &[],
            None,
            None,
        )
        .unwrap();

        assert_eq!(leg.nodes.len(), 2);
        assert_eq!(leg.edge_count(), 1);
        let edge_record = leg.edges().next().unwrap();
        assert_eq!(edge_record.length_km, Some(0.001));

        let shape = polyline::decode(leg.shape.as_ref().unwrap());
        assert!(shape.len() >= 2);
        assert!(shape[0].haversine_distance(&shape[1]) < 0.01);
    }

    #[test]
    fn two_edge_leg_has_contiguous_shape_indices() {
        let reader = reader_with(chain_tile(2));
        let mut origin = location_on(forward_edge_id(0), 0.0, node_latlng(0));
        let mut dest = location_on(forward_edge_id(1), 1.0, node_latlng(2));
        let path = [
            drive_step(forward_edge_id(0), 11.1),
            drive_step(forward_edge_id(1), 22.2),
        ];

        let leg = run_build(
            &reader,
            &path,
            &mut origin,
            &mut dest,
            &AttributesController::all(),
            &[],
            None,
            None,
        )
        .unwrap();

        // node_count == edge_count + 1 == path length + 1.
        assert_eq!(leg.nodes.len(), 3);
        assert_eq!(leg.edge_count(), 2);

        let edges: Vec<_> = leg.edges().collect();
        assert_eq!(edges[0].begin_shape_index, Some(0));
        assert_eq!(edges[0].end_shape_index, edges[1].begin_shape_index);

        let shape = polyline::decode(leg.shape.as_ref().unwrap());
        assert_eq!(edges[1].end_shape_index, Some(shape.len() - 1));

        // Per-segment lengths (decimeters) sum to the shape length.
        let attributes = leg.shape_attributes.as_ref().unwrap();
        assert_eq!(attributes.length.len(), shape.len() - 1);
        let total_m: f64 = attributes.length.iter().map(|dm| *dm as f64 / 10.0).sum();
        assert!((total_m - polyline_length(&shape)).abs() < 0.5, "{total_m}");

        // Headings along the equator point due east.
        assert_eq!(edges[0].begin_heading, Some(90));
        assert_eq!(edges[1].end_heading, Some(90));

        // Every admin index points into the admin list.
        for node in &leg.nodes {
            assert!((node.admin_index.unwrap() as usize) < leg.admins.len());
        }

        assert_eq!(leg.osm_changeset, Some(42_424_242));
        assert!(leg.bbox.is_some());
    }

    #[test]
    fn discontinuity_breaks_shape_index_contiguity() {
        let reader = reader_with(chain_tile(2));
        let mut origin = location_on(forward_edge_id(0), 0.0, node_latlng(0));
        let mut dest = location_on(forward_edge_id(1), 1.0, node_latlng(2));
        let path = [
            drive_step(forward_edge_id(0), 11.1),
            drive_step(forward_edge_id(1), 22.2),
        ];

        let mut trimming = EdgeTrimming::default();
        trimming.insert(
            1,
            (
                EdgeTrimmingInfo {
                    trim: true,
                    distance_along: 0.3,
                    vertex: node_latlng(1).point_along_segment(&node_latlng(2), 0.3),
                },
                EdgeTrimmingInfo {
                    trim: true,
                    distance_along: 0.7,
                    vertex: node_latlng(1).point_along_segment(&node_latlng(2), 0.7),
                },
            ),
        );

        let leg = run_build(
            &reader,
            &path,
            &mut origin,
            &mut dest,
            &AttributesController::all(),
            &[],
            Some(&trimming),
            None,
        )
        .unwrap();

        let edges: Vec<_> = leg.edges().collect();
        assert_eq!(
            edges[1].begin_shape_index.unwrap(),
            edges[0].end_shape_index.unwrap() + 1
        );
        // Trimmed to 40% of the segment.
        let expected_km = SEGMENT_LENGTH_M as f32 * 0.001 * 0.4;
        assert!((edges[1].length_km.unwrap() - expected_km).abs() < 1e-4);
    }

    #[test]
    fn timezone_crossing_differs_per_node() {
        let mut tile = chain_tile(2);
        let paris = TimeZoneDb::global().index_of("Europe/Paris").unwrap();
        tile.nodes[1].timezone = paris;
        let reader = reader_with(tile);

        let mut origin = Location {
            date_time: Some("2024-01-03T08:00".into()),
            ..location_on(forward_edge_id(0), 0.0, node_latlng(0))
        };
        let mut dest = location_on(forward_edge_id(1), 1.0, node_latlng(2));
        let path = [
            drive_step(forward_edge_id(0), 11.1),
            drive_step(forward_edge_id(1), 22.2),
        ];

        let leg = run_build(
            &reader,
            &path,
            &mut origin,
            &mut dest,
            &AttributesController::all(),
            &[],
            None,
            None,
        )
        .unwrap();

        assert_eq!(leg.nodes[0].time_zone.as_deref(), Some("UTC"));
        assert_eq!(leg.nodes[1].time_zone.as_deref(), Some("Europe/Paris"));
    }

    #[test]
    fn recosting_attaches_rectangular_columns() {
        let reader = reader_with(chain_tile(2));
        let mut origin = location_on(forward_edge_id(0), 0.0, node_latlng(0));
        let mut dest = location_on(forward_edge_id(1), 1.0, node_latlng(2));
        let path = [
            drive_step(forward_edge_id(0), 11.1),
            drive_step(forward_edge_id(1), 22.2),
        ];

        let ok_costing = TestCosting;
        let failing = RejectingCosting {
            reject_end_node: node_id(2),
        };
        let recostings: [&dyn Costing; 2] = [&ok_costing, &failing];

        let leg = run_build(
            &reader,
            &path,
            &mut origin,
            &mut dest,
            &AttributesController::all(),
            &recostings,
            None,
            None,
        )
        .unwrap();

        for node in &leg.nodes {
            assert_eq!(node.recosts.len(), 2);
            assert!(node.recosts[0].is_some());
            // The failed replay pads with nulls on every node.
            assert!(node.recosts[1].is_none());
        }

        let first = leg.nodes[0].recosts[0].unwrap();
        assert_eq!(first.elapsed_cost.secs, 0.0);

        let middle = leg.nodes[1].recosts[0].unwrap();
        assert!((middle.elapsed_cost.secs - 11.1).abs() < 0.01);

        let last = leg.nodes[2].recosts[0].unwrap();
        assert!((last.elapsed_cost.secs - 22.2).abs() < 0.01);
        assert_eq!(last.transition_cost.secs, 0.0);
    }

    fn bus_tile() -> crate::graph::GraphTile {
        let mut tile = chain_tile(2);
        // Both forward edges become one bus line.
        for index in [0usize, 2] {
            tile.directed_edges[index].use_type = EdgeUse::Bus;
            tile.directed_edges[index].line_id = 9;
        }
        tile.nodes[0].node_type = crate::graph::NodeType::TransitPlatform;
        tile.nodes[0].stop_index = 0;
        tile.nodes[1].node_type = crate::graph::NodeType::TransitPlatform;
        tile.nodes[1].stop_index = 1;
        tile.transit_stops = vec![
            TransitStop {
                one_stop_id: "s-alpha".into(),
                name: "Platform Alpha".into(),
            },
            TransitStop {
                one_stop_id: "s-beta".into(),
                name: "Platform Beta".into(),
            },
        ];
        tile.transit_departures = vec![TransitDeparture {
            line_id: 9,
            trip_id: 7,
            block_id: 55,
            route_index: 0,
            schedule_index: 0,
            // 08:03:20 local, 200 s after the origin departure.
            departure_time: 29_000,
            elapsed_time: 600,
            headsign: "Centre".into(),
        }];
        tile.transit_routes = vec![TransitRoute {
            route_type: TransitType::Bus,
            one_stop_id: "r-nine".into(),
            short_name: "9".into(),
            long_name: "Line Nine".into(),
            operator_name: "City Transit".into(),
            ..Default::default()
        }];
        tile.transit_schedules = vec![TransitSchedule { end_day: 10_000 }];
        tile
    }

    #[test]
    fn transit_leg_projects_schedule_times() {
        let reader = reader_with(bus_tile());
        let mut origin = Location {
            date_time: Some("2024-01-03T08:00".into()),
            ..location_on(forward_edge_id(0), 0.0, node_latlng(0))
        };
        let mut dest = location_on(forward_edge_id(1), 1.0, node_latlng(2));

        let mut first = PathStep::new(forward_edge_id(0), TravelMode::Transit, 800.0);
        first.trip_id = 7;
        let second = PathStep::new(forward_edge_id(1), TravelMode::Transit, 900.0);
        let path = [first, second];

        let leg = run_build(
            &reader,
            &path,
            &mut origin,
            &mut dest,
            &AttributesController::all(),
            &[],
            None,
            None,
        )
        .unwrap();

        let boarding = leg.nodes[0].transit_platform_info.as_ref().unwrap();
        assert_eq!(boarding.platform_type, Some(TransitPlatformType::Stop));
        assert_eq!(boarding.onestop_id.as_deref(), Some("s-alpha"));
        assert!(!boarding.assumed_schedule);
        let departure = boarding.departure_date_time.as_deref().unwrap();
        assert!(departure.starts_with("2024-01-03T08:03"), "{departure}");
        // The formatted stamp keeps the offset but drops the abbreviation.
        assert!(!departure.ends_with("UTC"), "{departure}");

        // The next platform carries the arrival projected from departure +
        // elapsed.
        let alighting = leg.nodes[1].transit_platform_info.as_ref().unwrap();
        let arrival = alighting.arrival_date_time.as_deref().unwrap();
        assert!(arrival.starts_with("2024-01-03T08:13"), "{arrival}");

        // The bus edge carries the route context and the departure's block.
        let edges: Vec<_> = leg.edges().collect();
        let route_info = edges[0].transit_route_info.as_ref().unwrap();
        assert_eq!(route_info.block_id, Some(55));
        assert_eq!(route_info.trip_id, Some(7));
        assert_eq!(route_info.onestop_id.as_deref(), Some("r-nine"));
        assert_eq!(route_info.headsign.as_deref(), Some("Centre"));
        assert_eq!(route_info.operator_name.as_deref(), Some("City Transit"));
        assert_eq!(edges[0].transit_type, Some(TransitType::Bus));
        assert_eq!(edges[0].travel_mode, Some(crate::leg::LegTravelMode::Transit));

        // No departing trip on the second edge's platform projection.
        assert!(edges[1].transit_route_info.is_none());
    }

    #[test]
    fn assumed_schedule_when_tile_predates_request() {
        let mut tile = bus_tile();
        // Tile built "after" the requested date.
        tile.header.date_created = 10_000;
        let reader = reader_with(tile);

        let mut origin = Location {
            date_time: Some("2024-01-03T08:00".into()),
            ..location_on(forward_edge_id(0), 0.0, node_latlng(0))
        };
        let mut dest = location_on(forward_edge_id(1), 1.0, node_latlng(2));
        let mut first = PathStep::new(forward_edge_id(0), TravelMode::Transit, 800.0);
        first.trip_id = 7;
        let path = [first, PathStep::new(forward_edge_id(1), TravelMode::Transit, 900.0)];

        let leg = run_build(
            &reader,
            &path,
            &mut origin,
            &mut dest,
            &AttributesController::all(),
            &[],
            None,
            None,
        )
        .unwrap();

        let boarding = leg.nodes[0].transit_platform_info.as_ref().unwrap();
        assert!(boarding.assumed_schedule);
    }

    #[test]
    fn interrupt_fails_before_any_leg_state() {
        let reader = reader_with(chain_tile(1));
        let edge = forward_edge_id(0);
        let mut origin = location_on(edge, 0.0, node_latlng(0));
        let mut dest = location_on(edge, 1.0, node_latlng(1));
        let path = [drive_step(edge, 10.0)];

        let cancel = || true;
        let result = run_build(
            &reader,
            &path,
            &mut origin,
            &mut dest,
            &AttributesController::all(),
            &[],
            None,
            Some(&cancel),
        );

        assert!(matches!(result, Err(LegError::Interrupted)));
    }

    #[test]
    fn empty_path_is_rejected() {
        let reader = reader_with(chain_tile(1));
        let mut origin = Location::at(node_latlng(0));
        let mut dest = Location::at(node_latlng(1));
        let result = run_build(
            &reader,
            &[],
            &mut origin,
            &mut dest,
            &AttributesController::all(),
            &[],
            None,
            None,
        );
        assert!(matches!(result, Err(LegError::EmptyPath)));
    }

    #[test]
    fn unmatched_candidates_do_not_abort() {
        let reader = reader_with(chain_tile(2));
        // Origin never snapped to anything on the path.
        let mut origin = Location::at(node_latlng(0));
        let mut dest = location_on(forward_edge_id(1), 1.0, node_latlng(2));
        let path = [
            drive_step(forward_edge_id(0), 11.1),
            drive_step(forward_edge_id(1), 22.2),
        ];

        let leg = run_build(
            &reader,
            &path,
            &mut origin,
            &mut dest,
            &AttributesController::all(),
            &[],
            None,
            None,
        )
        .unwrap();

        assert!(leg.locations[0].candidates.is_empty());
        assert!(leg.locations[0].projected_ll.is_none());
        assert_eq!(leg.nodes.len(), 3);
    }

    #[test]
    fn disabled_controller_leaves_gated_fields_unset() {
        let reader = reader_with(chain_tile(2));
        let mut origin = location_on(forward_edge_id(0), 0.0, node_latlng(0));
        let mut dest = location_on(forward_edge_id(1), 1.0, node_latlng(2));
        let path = [
            drive_step(forward_edge_id(0), 11.1),
            drive_step(forward_edge_id(1), 22.2),
        ];

        let leg = run_build(
            &reader,
            &path,
            &mut origin,
            &mut dest,
            &AttributesController::none(),
            &[],
            None,
            None,
        )
        .unwrap();

        assert_eq!(leg.nodes.len(), 3);
        assert!(leg.shape.is_none());
        assert!(leg.shape_attributes.is_none());
        assert!(leg.admins.is_empty());
        assert!(leg.osm_changeset.is_none());
        // Structure survives even with every attribute off.
        assert!(leg.bbox.is_some());
        for edge in leg.edges() {
            assert!(edge.speed.is_none());
            assert!(edge.length_km.is_none());
            assert!(edge.begin_shape_index.is_none());
            assert!(edge.names.is_empty());
        }
    }

    #[test]
    fn intersecting_edges_skip_path_and_opposing() {
        // At node 1 of a two-edge chain the only incident edges are the
        // path edge, its continuation, and their twins, so nothing but the
        // backward twin of the *next* edge qualifies.
        let reader = reader_with(chain_tile(2));
        let mut origin = location_on(forward_edge_id(0), 0.0, node_latlng(0));
        let mut dest = location_on(forward_edge_id(1), 1.0, node_latlng(2));
        let path = [
            drive_step(forward_edge_id(0), 11.1),
            drive_step(forward_edge_id(1), 22.2),
        ];

        let leg = run_build(
            &reader,
            &path,
            &mut origin,
            &mut dest,
            &AttributesController::all(),
            &[],
            None,
            None,
        )
        .unwrap();

        // Node 0 lists the opposing of nothing (no prior edge), so only the
        // path edge itself is excluded there.
        assert!(leg.nodes[0].intersecting_edges.is_empty());
        // At node 1: backward edge (local 0) is the prior edge's twin and
        // the forward edge (local 1) is the current path edge.
        assert!(leg.nodes[1].intersecting_edges.is_empty());
    }

    /// Chain of two segments with a spur hanging north off the middle node.
    fn tee_tile() -> crate::graph::GraphTile {
        let mut tile = chain_tile(2);
        let spur_node = LatLng::new(NODE_SPACING_DEG_LAT, node_latlng(1).lng);

        // The spur slots in after node 1's two existing edges; node 2's
        // edges shift down by one.
        let spur_index = (tile.nodes[1].edge_index + tile.nodes[1].edge_count) as usize;
        tile.edge_infos.push(crate::graph::EdgeInfo {
            way_id: 2_000,
            shape: vec![node_latlng(1), spur_node],
            ..Default::default()
        });
        tile.directed_edges.insert(
            spur_index,
            crate::graph::DirectedEdge {
                end_node: node_id(3),
                length: SEGMENT_LENGTH_M,
                edge_info_index: 2,
                forward: true,
                local_edge_index: 2,
                opposing_index: 0,
                opposing_local_index: 0,
                forward_access: crate::constants::access::ALL,
                reverse_access: crate::constants::access::ALL,
                speed: 36,
                ..Default::default()
            },
        );
        tile.nodes[1].edge_count += 1;
        tile.nodes[2].edge_index += 1;
        tile.nodes[1].headings[2] = 0;

        // The spur's twin lives at a new node 3.
        let twin_index = tile.directed_edges.len() as u32;
        tile.directed_edges.push(crate::graph::DirectedEdge {
            end_node: node_id(1),
            length: SEGMENT_LENGTH_M,
            edge_info_index: 2,
            forward: false,
            local_edge_index: 0,
            opposing_index: 2,
            opposing_local_index: 2,
            forward_access: crate::constants::access::ALL,
            reverse_access: crate::constants::access::ALL,
            speed: 36,
            ..Default::default()
        });
        tile.nodes.push(crate::graph::NodeInfo {
            edge_index: twin_index,
            edge_count: 1,
            latlng: spur_node,
            ..Default::default()
        });

        tile
    }

    const NODE_SPACING_DEG_LAT: f64 = 0.001;

    #[test]
    fn spur_appears_as_intersecting_edge() {
        let reader = reader_with(tee_tile());
        let mut origin = location_on(forward_edge_id(0), 0.0, node_latlng(0));
        let mut dest = location_on(forward_edge_id(1), 1.0, node_latlng(2));
        let path = [
            drive_step(forward_edge_id(0), 11.1),
            drive_step(forward_edge_id(1), 22.2),
        ];

        let leg = run_build(
            &reader,
            &path,
            &mut origin,
            &mut dest,
            &AttributesController::all(),
            &[],
            None,
            None,
        )
        .unwrap();

        let intersecting = &leg.nodes[1].intersecting_edges;
        assert_eq!(intersecting.len(), 1);
        let record = &intersecting[0];
        assert_eq!(record.begin_heading, Some(0));
        assert_eq!(
            record.walkability,
            Some(crate::graph::Traversability::Both)
        );
        assert_eq!(record.use_type, Some(EdgeUse::Road));
    }
}
