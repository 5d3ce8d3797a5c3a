use serde::{Deserialize, Serialize};

/// Lane connectivity from an inbound way onto this edge.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LaneConnectivity {
    pub from_way_id: u64,
    /// Pipe-separated lane indices on the inbound way, e.g. `"0|1"`.
    pub from_lanes: String,
    /// Pipe-separated lane indices on this edge.
    pub to_lanes: String,
}
