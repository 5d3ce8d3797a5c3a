//! Shape trimming and per-segment attribute cutting.

use smallvec::SmallVec;

use crate::constants::{DECIMETER_PER_METER, MILLISECOND_PER_SEC, UNKNOWN_TRAFFIC_SPEED_RAW};
use crate::controller::{Attribute, AttributesController};
use crate::graph::{DirectedEdge, GraphTile};
use crate::latlng::LatLng;
use crate::leg::TripLeg;

/// Clips a polyline to the window `[start_dist, end_dist]` (meters along the
/// shape), replacing the removed prefix and suffix with the given vertices.
/// The result always keeps at least the two endpoint vertices.
pub fn trim_shape(
    start_dist: f64,
    start_vertex: LatLng,
    end_dist: f64,
    end_vertex: LatLng,
    shape: &mut Vec<LatLng>,
) {
    if shape.is_empty() {
        return;
    }

    let mut trimmed = Vec::with_capacity(shape.len() + 2);
    trimmed.push(start_vertex);

    let mut walked = 0.0;
    for i in 1..shape.len() {
        walked += shape[i].haversine_distance(&shape[i - 1]);
        if walked > start_dist && walked < end_dist {
            trimmed.push(shape[i]);
        }
        if walked >= end_dist {
            break;
        }
    }

    trimmed.push(end_vertex);
    *shape = trimmed;
}

/// Subdivides the freshly appended edge shape at traffic-speed breakpoints
/// and pushes one time/length/speed entry per resulting segment.
///
/// Breakpoints decide only *where* cuts happen; the value always comes from
/// the baseline speed derived from the path's own elapsed time, because the
/// traffic records may have changed since the path was found.
#[allow(clippy::too_many_arguments)]
pub fn set_shape_attributes(
    controller: &AttributesController,
    tile: &GraphTile,
    edge: &DirectedEdge,
    edge_index: u32,
    shape: &mut Vec<LatLng>,
    shape_begin: usize,
    leg: &mut TripLeg,
    src_pct: f64,
    tgt_pct: f64,
    edge_seconds: f64,
    cut_for_traffic: bool,
) {
    if leg.shape_attributes.is_none() {
        return;
    }

    // Percent along the edge paired with the speed to use up to that point.
    let mut speeds: SmallVec<[(f64, f64); 4]> = SmallVec::new();
    let speed = (edge.length as f64 * (tgt_pct - src_pct)) / edge_seconds;
    if cut_for_traffic {
        let traffic = tile.traffic_speed(edge_index);
        if traffic.breakpoint1 > 0 {
            speeds.push((traffic.breakpoint1 as f64 / 255.0, speed));
            if traffic.breakpoint2 > 0 {
                speeds.push((traffic.breakpoint2 as f64 / 255.0, speed));
                if traffic.speed3 != UNKNOWN_TRAFFIC_SPEED_RAW {
                    speeds.push((1.0, speed));
                }
            }
        }
    }
    // Cap the end so there is always a marker covering the target percent.
    if speeds.last().is_none_or(|(pct, _)| *pct < tgt_pct) {
        speeds.push((tgt_pct, speed));
    }

    let mut distance_total_pct = src_pct;
    let mut marker = speeds
        .iter()
        .position(|(pct, _)| distance_total_pct <= *pct)
        .unwrap_or(speeds.len() - 1);

    let mut i = shape_begin + 1;
    while i < shape.len() {
        let mut distance = shape[i].haversine_distance(&shape[i - 1]);
        let distance_pct = distance / edge.length as f64;
        let mut next_total = distance_total_pct + distance_pct;
        let mut shift = 0;

        if next_total > speeds[marker].0 && marker + 1 < speeds.len() {
            // Synthesize a vertex at the exact crossing and split the segment.
            let coef = (speeds[marker].0 - distance_total_pct) / (next_total - distance_total_pct);
            let point = shape[i - 1].point_along_segment(&shape[i], coef);
            shape.insert(i, point);
            next_total = speeds[marker].0;
            distance *= coef;
            shift = 1;
        }
        distance_total_pct = next_total;
        let time = distance / speeds[marker].1;

        let attributes = leg.shape_attributes.as_mut().expect("checked above");
        if controller.enabled(Attribute::ShapeAttributesTime) {
            attributes.time.push((time * MILLISECOND_PER_SEC + 0.5) as u32);
        }
        if controller.enabled(Attribute::ShapeAttributesLength) {
            attributes
                .length
                .push((distance * DECIMETER_PER_METER + 0.5) as u32);
        }
        if controller.enabled(Attribute::ShapeAttributesSpeed) {
            attributes
                .speed
                .push((distance * DECIMETER_PER_METER / time + 0.5) as u32);
        }

        // Advance past the marker only after the attributes for the cut
        // segment are in.
        marker += shift;
        i += 1;
    }
}
