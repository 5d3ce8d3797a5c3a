use serde::{Deserialize, Serialize};

use super::{GraphId, Traversability};
use crate::latlng::LatLng;

/// Maximum number of local (level-2) edges tracked per node for headings,
/// driveability, and name consistency.
pub const MAX_LOCAL_EDGES: usize = 8;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    #[default]
    StreetIntersection,
    Gate,
    Bollard,
    TollBooth,
    TransitEgress,
    TransitStation,
    TransitPlatform,
    BikeShare,
    Parking,
    MotorwayJunction,
    BorderControl,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntersectionType {
    #[default]
    Regular,
    False,
    DeadEnd,
    Fork,
}

/// Node within a tile. Nodes use a forward-star layout: `edge_index` points
/// at the first outgoing directed edge and `edge_count` covers the rest.
#[derive(Clone, Debug)]
pub struct NodeInfo {
    pub node_type: NodeType,
    pub intersection: IntersectionType,
    /// Index into the tile's admin table.
    pub admin_index: u32,
    /// Index into the process-wide timezone registry.
    pub timezone: u32,
    /// Index into the tile's transit stop table (transit nodes only).
    pub stop_index: u32,
    pub edge_index: u32,
    pub edge_count: u32,
    pub transition_index: u32,
    pub transition_count: u32,
    pub drive_on_right: bool,
    pub named_intersection: bool,
    pub latlng: LatLng,
    /// Heading in degrees of each local edge leaving this node.
    pub headings: [u16; MAX_LOCAL_EDGES],
    pub local_driveability: [Traversability; MAX_LOCAL_EDGES],
}

impl Default for NodeInfo {
    fn default() -> Self {
        NodeInfo {
            node_type: NodeType::default(),
            intersection: IntersectionType::default(),
            admin_index: 0,
            timezone: 0,
            stop_index: 0,
            edge_index: 0,
            edge_count: 0,
            transition_index: 0,
            transition_count: 0,
            drive_on_right: true,
            named_intersection: false,
            latlng: LatLng::default(),
            headings: [0; MAX_LOCAL_EDGES],
            local_driveability: [Traversability::None; MAX_LOCAL_EDGES],
        }
    }
}

impl NodeInfo {
    pub fn heading(&self, local_index: u32) -> u32 {
        self.headings
            .get(local_index as usize)
            .copied()
            .unwrap_or(0)
            .into()
    }

    pub fn local_driveability(&self, local_index: u32) -> Traversability {
        self.local_driveability
            .get(local_index as usize)
            .copied()
            .unwrap_or(Traversability::None)
    }

    /// True only for transit platform nodes, where schedule projection runs.
    pub fn is_transit(&self) -> bool {
        self.node_type == NodeType::TransitPlatform
    }
}

/// Transition from a node to its twin on another hierarchy level.
#[derive(Copy, Clone, Debug)]
pub struct NodeTransition {
    pub end_node: GraphId,
    pub up: bool,
}
