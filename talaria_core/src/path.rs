use serde::{Deserialize, Serialize};

use crate::costing::TravelMode;
use crate::graph::GraphId;

/// Seconds and weighted cost, as accumulated by the path finder.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    pub secs: f64,
    pub cost: f64,
}

impl Cost {
    pub fn new(secs: f64, cost: f64) -> Cost {
        Cost { secs, cost }
    }
}

impl std::ops::Add for Cost {
    type Output = Cost;

    fn add(self, other: Cost) -> Cost {
        Cost {
            secs: self.secs + other.secs,
            cost: self.cost + other.cost,
        }
    }
}

impl std::ops::AddAssign for Cost {
    fn add_assign(&mut self, other: Cost) {
        self.secs += other.secs;
        self.cost += other.cost;
    }
}

/// One step of an already-computed path. Produced by the path finder;
/// read-only here.
#[derive(Copy, Clone, Debug)]
pub struct PathStep {
    pub edge_id: GraphId,
    pub mode: TravelMode,
    /// Transit trip id, 0 for non-transit steps.
    pub trip_id: u32,
    /// Cost accumulated from the leg origin through this edge.
    pub elapsed_cost: Cost,
    /// Cost of the transition onto this edge.
    pub transition_cost: Cost,
    /// Position of the active access restriction in the mode-filtered
    /// restriction list, when one applied at traversal time.
    pub restriction_index: Option<u32>,
}

impl PathStep {
    pub fn new(edge_id: GraphId, mode: TravelMode, elapsed_secs: f64) -> PathStep {
        PathStep {
            edge_id,
            mode,
            trip_id: 0,
            elapsed_cost: Cost::new(elapsed_secs, elapsed_secs),
            transition_cost: Cost::default(),
            restriction_index: None,
        }
    }
}
