use serde::{Deserialize, Serialize};

use crate::graph::{DirectedEdge, GraphTile, NodeInfo};
use crate::path::Cost;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TravelMode {
    #[default]
    Drive = 0,
    Pedestrian = 1,
    Bicycle = 2,
    Transit = 3,
}

impl TravelMode {
    pub const COUNT: usize = 4;

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Costing capability set for one travel mode. The builder never costs a
/// whole path with this; it asks for per-edge costs, access semantics, and
/// the flow flags that drove the path in the first place.
pub trait Costing {
    /// Cost of traversing the full edge, given the time-of-week at entry.
    fn edge_cost(&self, edge: &DirectedEdge, tile: &GraphTile, second_of_week: u32) -> Cost;

    /// Cost of the transition through `node` from `from` onto `to`.
    fn transition_cost(&self, from: &DirectedEdge, node: &NodeInfo, to: &DirectedEdge) -> Cost {
        let _ = (from, node, to);
        Cost::default()
    }

    /// Access bit this mode travels under, see [`crate::constants::access`].
    fn access_mode(&self) -> u16;

    /// Mode-specific vehicle/pedestrian/bicycle type.
    fn travel_type(&self) -> u8 {
        0
    }

    /// Which traffic flow sources the costing consults.
    fn flow_mask(&self) -> u8 {
        0
    }

    /// Rent/return cost at a bike-share station.
    fn bss_cost(&self) -> Cost {
        Cost::default()
    }

    fn allowed(&self, edge: &DirectedEdge) -> bool {
        edge.forward_access & self.access_mode() != 0
    }
}

/// Per-mode costing array, indexed by [`TravelMode`]. Entries may be absent
/// for modes the request does not use.
pub type ModeCosting<'a> = [Option<&'a dyn Costing>; TravelMode::COUNT];
