//! Post-hoc recosting: replays the finished leg forward under alternate
//! costings and attaches per-node cost pairs. A failed replay pads every
//! node with a null entry so the `recosts` vectors stay rectangular.

use crate::constants::SECONDS_PER_WEEK;
use crate::costing::Costing;
use crate::error::RecostError;
use crate::graph::{GraphId, GraphReader};
use crate::leg::{LegCost, TripLeg};
use crate::path::Cost;
use crate::time_info::TimeInfo;

/// Label emitted once per replayed edge: the transition cost paid at the
/// edge's start node and the elapsed cost at its end.
#[derive(Copy, Clone, Debug)]
pub struct RecostLabel {
    pub elapsed_cost: Cost,
    pub transition_cost: Cost,
}

/// Replays a sequence of edges under `costing`. The edge callback yields ids
/// until an invalid one; the label callback receives one label per edge.
/// First and last edges are scaled by the partial traversal percentages.
pub fn recost_forward(
    reader: &dyn GraphReader,
    costing: &dyn Costing,
    mut edge_cb: impl FnMut() -> GraphId,
    mut label_cb: impl FnMut(RecostLabel),
    src_pct: f32,
    tgt_pct: f32,
    time_info: &TimeInfo,
) -> Result<(), RecostError> {
    let mut edge_ids = Vec::new();
    loop {
        let id = edge_cb();
        if !id.is_valid() {
            break;
        }
        edge_ids.push(id);
    }
    if edge_ids.is_empty() {
        return Err(RecostError::EmptyLeg);
    }

    let mut elapsed = Cost::default();
    let mut second_of_week = time_info.second_of_week;
    let mut prev_edge = None;

    for (i, id) in edge_ids.iter().enumerate() {
        let tile = reader.get_tile(*id).ok_or(RecostError::MissingTile(*id))?;
        let directededge = tile
            .directed_edge(*id)
            .ok_or(RecostError::MissingTile(*id))?;

        if !costing.allowed(directededge) {
            return Err(RecostError::Inaccessible(*id));
        }

        let mut transition = Cost::default();
        if let Some(prev) = prev_edge {
            let prev_de = reader
                .directed_edge(prev)
                .ok_or(RecostError::MissingTile(prev))?;
            if let Some(node) = reader.node_info(prev_de.end_node) {
                transition = costing.transition_cost(prev_de, node, directededge);
            }
        }

        let mut edge_cost = costing.edge_cost(directededge, tile, second_of_week);
        let mut pct = 1.0;
        if i == 0 {
            pct -= src_pct as f64;
        }
        if i == edge_ids.len() - 1 {
            pct -= 1.0 - tgt_pct as f64;
        }
        edge_cost.secs *= pct;
        edge_cost.cost *= pct;

        elapsed += transition;
        elapsed += edge_cost;
        second_of_week =
            (second_of_week + (transition.secs + edge_cost.secs) as u32) % SECONDS_PER_WEEK;

        label_cb(RecostLabel {
            elapsed_cost: elapsed,
            transition_cost: transition,
        });
        prev_edge = Some(*id);
    }

    Ok(())
}

/// Runs every requested recosting over the leg. Seeds the first node with a
/// zero elapsed cost, zeroes the final transition on success, and on failure
/// replaces the partial column with nulls of equal length on every node.
pub fn accumulate_recosting_info_forward(
    recostings: &[&dyn Costing],
    src_pct: f32,
    tgt_pct: f32,
    time_info: &TimeInfo,
    reader: &dyn GraphReader,
    leg: &mut TripLeg,
) {
    if leg.nodes.is_empty() {
        return;
    }

    // Edge ids come from the leg itself; the terminal node has none.
    let edge_ids: Vec<GraphId> = leg
        .nodes
        .iter()
        .map(|node| {
            node.edge
                .as_ref()
                .and_then(|edge| edge.id)
                .map(GraphId::new)
                .unwrap_or_default()
        })
        .collect();

    for costing in recostings {
        let mut in_iter = edge_ids.iter().copied();
        let mut out_index = 0usize;

        // No elapsed time yet at the start of the leg.
        leg.nodes[0].recosts.push(Some(LegCost {
            elapsed_cost: Cost::default(),
            transition_cost: Cost::default(),
        }));

        let nodes = &mut leg.nodes;
        let result = recost_forward(
            reader,
            *costing,
            || in_iter.next().unwrap_or_default(),
            |label| {
                // Turn cost at this node, then elapsed hangs on the next one.
                if let Some(Some(recost)) = nodes[out_index].recosts.last_mut() {
                    recost.transition_cost = label.transition_cost;
                }
                out_index += 1;
                nodes[out_index].recosts.push(Some(LegCost {
                    elapsed_cost: label.elapsed_cost,
                    transition_cost: Cost::default(),
                }));
            },
            src_pct,
            tgt_pct,
            time_info,
        );

        match result {
            Ok(()) => {
                // No turn cost at the end of the leg.
                if let Some(Some(recost)) =
                    leg.nodes.last_mut().and_then(|node| node.recosts.last_mut())
                {
                    recost.transition_cost = Cost::default();
                }
            }
            Err(error) => {
                tracing::debug!(%error, "recosting failed, padding with nulls");
                let should_have = leg.nodes[0].recosts.len();
                for node in &mut leg.nodes {
                    if node.recosts.len() == should_have {
                        node.recosts.pop();
                    }
                    node.recosts.push(None);
                }
            }
        }
    }
}
