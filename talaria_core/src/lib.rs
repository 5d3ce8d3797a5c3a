//! Trip-leg construction over a tiled road graph.
//!
//! Given an already-computed path (an ordered list of directed-edge ids) plus
//! the user's origin, through points, and destination, [`LegBuilder`]
//! materialises a fully annotated [`TripLeg`]: per-edge attribution, per-node
//! context, the stitched shape with per-segment attributes, transit schedule
//! projection, and optional recosting under alternate cost models.
//!
//! The path finder, tile storage format, and request transports are external
//! collaborators, reached through the [`graph::GraphReader`],
//! [`costing::Costing`], and [`controller::AttributesController`] seams.

pub mod builder;
pub mod constants;
pub mod controller;
pub mod costing;
pub mod error;
pub mod graph;
pub mod latlng;
pub mod leg;
pub mod location;
pub mod path;
pub mod polyline;
pub mod time_info;

#[cfg(test)]
mod test_tiles;

pub use builder::{EdgeTrimming, EdgeTrimmingInfo, LegBuilder, Options};
pub use controller::{Attribute, AttributesController, Category};
pub use costing::{Costing, ModeCosting, TravelMode};
pub use error::{LegError, RecostError};
pub use latlng::LatLng;
pub use leg::TripLeg;
pub use location::{Location, PathEdgeCandidate, SideOfStreet};
pub use path::{Cost, PathStep};
pub use time_info::{TimeInfo, TimeZoneDb};
