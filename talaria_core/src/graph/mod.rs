mod admin;
mod directed_edge;
mod edge_info;
mod graph_id;
mod lane;
mod node_info;
mod reader;
mod restriction;
mod sign;
mod tile;
mod time_domain;
mod traffic;
mod transit;

pub use admin::Admin;
pub use directed_edge::{CycleLane, DirectedEdge, EdgeUse, RoadClass, Surface};
pub use edge_info::EdgeInfo;
pub use graph_id::GraphId;
pub use lane::LaneConnectivity;
pub use node_info::{IntersectionType, NodeInfo, NodeTransition, NodeType, MAX_LOCAL_EDGES};
pub use reader::{GraphReader, TileSet};
pub use restriction::{
    AccessRestriction, AccessRestrictionType, ComplexRestriction, RestrictionType,
};
pub use sign::{Sign, SignType};
pub use tile::{GraphTile, GraphTileHeader};
pub use time_domain::TimeDomain;
pub use traffic::TrafficSpeed;
pub use transit::{TransitDeparture, TransitRoute, TransitSchedule, TransitStop, TransitType};

use serde::{Deserialize, Serialize};

/// Which directions of an edge a mode can actually travel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Traversability {
    #[default]
    None,
    Forward,
    Backward,
    Both,
}
