use fxhash::FxHashSet;

use crate::graph::GraphId;
use crate::leg::TripLeg;
use crate::location::Location;
use crate::path::PathStep;

/// Prunes a location's candidates down to the one edge actually used. When
/// no candidate matches the list is cleared; downstream must tolerate that.
pub fn remove_path_edges(location: &mut Location, edge_id: GraphId) {
    match location
        .candidates
        .iter()
        .position(|candidate| candidate.edge_id == edge_id)
    {
        Some(position) => {
            location.candidates.swap(0, position);
            location.candidates.truncate(1);
        }
        None => location.candidates.clear(),
    }
}

/// Copies origin, throughs, and destination into the leg, pruning each
/// location (in place, then as the leg's copy) to its on-path edge. Throughs
/// match the first path edge at or after the previous match.
pub fn copy_locations(
    leg: &mut TripLeg,
    origin: &mut Location,
    throughs: &mut [Location],
    dest: &mut Location,
    path: &[PathStep],
) {
    remove_path_edges(origin, path[0].edge_id);
    leg.locations.push(origin.clone());

    let mut position = 0;
    for through in throughs {
        let ids: FxHashSet<GraphId> = through
            .candidates
            .iter()
            .map(|candidate| candidate.edge_id)
            .collect();
        match path[position..]
            .iter()
            .position(|step| ids.contains(&step.edge_id))
        {
            Some(offset) => {
                position += offset;
                remove_path_edges(through, path[position].edge_id);
            }
            None => through.candidates.clear(),
        }
        leg.locations.push(through.clone());
    }

    remove_path_edges(dest, path[path.len() - 1].edge_id);
    leg.locations.push(dest.clone());
}
