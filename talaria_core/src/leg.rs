//! The trip leg output model: alternating edge and node records plus the
//! stitched shape and its per-segment attribute vectors. Every field gated by
//! the controller is optional and stays unset when not requested.

use serde::{Deserialize, Serialize};

use crate::graph::{
    AccessRestrictionType, Admin, CycleLane, EdgeUse, LaneConnectivity, NodeType, RoadClass,
    Surface, TransitType, Traversability,
};
use crate::latlng::LatLng;
use crate::location::Location;
use crate::path::Cost;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreetName {
    pub value: String,
    pub is_route_number: bool,
}

impl StreetName {
    pub fn new(value: impl Into<String>, is_route_number: bool) -> StreetName {
        StreetName {
            value: value.into(),
            is_route_number,
        }
    }
}

/// Signs partitioned by family, as posted along or above the edge.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SignBlock {
    pub exit_numbers: Vec<StreetName>,
    pub exit_onto_streets: Vec<StreetName>,
    pub exit_toward_locations: Vec<StreetName>,
    pub exit_names: Vec<StreetName>,
    pub guide_onto_streets: Vec<StreetName>,
    pub guide_toward_locations: Vec<StreetName>,
    pub guidance_view_junctions: Vec<StreetName>,
    pub junction_names: Vec<StreetName>,
}

impl SignBlock {
    pub fn is_empty(&self) -> bool {
        self.exit_numbers.is_empty()
            && self.exit_onto_streets.is_empty()
            && self.exit_toward_locations.is_empty()
            && self.exit_names.is_empty()
            && self.guide_onto_streets.is_empty()
            && self.guide_toward_locations.is_empty()
            && self.guidance_view_junctions.is_empty()
            && self.junction_names.is_empty()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegTravelMode {
    Drive,
    Pedestrian,
    Bicycle,
    Transit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleType {
    Car,
    Motorcycle,
    AutoBus,
    Truck,
    MotorScooter,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PedestrianType {
    Foot,
    Wheelchair,
    Segway,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BicycleType {
    Road,
    Cross,
    Hybrid,
    Mountain,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sidewalk {
    Left,
    Right,
    BothSides,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransitRouteInfo {
    pub onestop_id: Option<String>,
    pub block_id: Option<u32>,
    pub trip_id: Option<u32>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub headsign: Option<String>,
    pub color: Option<u32>,
    pub text_color: Option<u32>,
    pub description: Option<String>,
    pub operator_onestop_id: Option<String>,
    pub operator_name: Option<String>,
    pub operator_url: Option<String>,
}

/// One edge record of the leg.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LegEdge {
    pub names: Vec<StreetName>,
    pub sign: Option<SignBlock>,
    /// Per-lane direction bitmasks.
    pub turn_lanes: Vec<u16>,
    pub road_class: Option<RoadClass>,
    pub length_km: Option<f32>,
    /// Actual traversal speed in km/h.
    pub speed: Option<f64>,
    pub begin_heading: Option<u32>,
    pub end_heading: Option<u32>,
    pub begin_shape_index: Option<usize>,
    pub end_shape_index: Option<usize>,
    pub traversability: Option<Traversability>,
    pub use_type: Option<EdgeUse>,
    pub toll: bool,
    pub unpaved: bool,
    pub tunnel: bool,
    pub bridge: bool,
    pub roundabout: bool,
    pub internal_intersection: bool,
    pub truck_route: bool,
    pub destination_only: bool,
    pub drive_on_right: Option<bool>,
    pub surface: Option<Surface>,
    pub travel_mode: Option<LegTravelMode>,
    pub vehicle_type: Option<VehicleType>,
    pub pedestrian_type: Option<PedestrianType>,
    pub bicycle_type: Option<BicycleType>,
    pub transit_type: Option<TransitType>,
    /// The directed edge's packed graph id value.
    pub id: Option<u64>,
    pub way_id: Option<u64>,
    pub weighted_grade: Option<f32>,
    pub max_upward_grade: Option<f32>,
    pub max_downward_grade: Option<f32>,
    pub mean_elevation: Option<f32>,
    pub lane_count: Option<u32>,
    pub cycle_lane: Option<CycleLane>,
    pub bicycle_network: Option<u8>,
    pub sidewalk: Option<Sidewalk>,
    pub density: Option<u32>,
    pub speed_limit: Option<u32>,
    pub default_speed: Option<u32>,
    pub truck_speed: Option<u32>,
    pub has_time_restrictions: bool,
    pub restriction_type: Option<AccessRestrictionType>,
    pub lane_connectivity: Vec<LaneConnectivity>,
    pub transit_route_info: Option<TransitRouteInfo>,
}

/// A non-path edge incident to an intermediate node.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IntersectingEdge {
    pub begin_heading: Option<u32>,
    pub walkability: Option<Traversability>,
    pub cyclability: Option<Traversability>,
    pub driveability: Option<Traversability>,
    pub prev_name_consistency: Option<bool>,
    pub curr_name_consistency: Option<bool>,
    pub use_type: Option<EdgeUse>,
    pub road_class: Option<RoadClass>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LegCost {
    pub elapsed_cost: Cost,
    pub transition_cost: Cost,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitPlatformType {
    Stop,
    Station,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransitPlatformInfo {
    pub platform_type: Option<TransitPlatformType>,
    pub onestop_id: Option<String>,
    pub name: Option<String>,
    pub station_onestop_id: Option<String>,
    pub station_name: Option<String>,
    pub ll: Option<LatLng>,
    pub arrival_date_time: Option<String>,
    pub departure_date_time: Option<String>,
    pub assumed_schedule: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransitStationInfo {
    pub onestop_id: Option<String>,
    pub name: Option<String>,
    pub ll: Option<LatLng>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransitEgressInfo {
    pub onestop_id: Option<String>,
    pub name: Option<String>,
    pub ll: Option<LatLng>,
}

/// Bike-share station context at a node. Identity fields stay unset until a
/// real bike-share feed backs them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BikeShareInfo {
    pub name: Option<String>,
    pub station_ref: Option<String>,
    pub capacity: Option<u32>,
    pub network: Option<String>,
    pub operator_name: Option<String>,
    pub rent_cost_secs: Option<f64>,
    pub return_cost_secs: Option<f64>,
}

/// One node record of the leg. Every node but the last carries the edge that
/// leaves it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LegNode {
    pub edge: Option<LegEdge>,
    pub intersecting_edges: Vec<IntersectingEdge>,
    pub cost: LegCost,
    /// One entry per requested recosting; `None` marks a failed replay.
    pub recosts: Vec<Option<LegCost>>,
    pub admin_index: Option<u32>,
    pub time_zone: Option<String>,
    pub node_type: Option<NodeType>,
    pub fork: bool,
    pub transit_platform_info: Option<TransitPlatformInfo>,
    pub transit_station_info: Option<TransitStationInfo>,
    pub transit_egress_info: Option<TransitEgressInfo>,
    pub bss_info: Option<BikeShareInfo>,
}

/// Per-polyline-segment attribute vectors; each has `shape.len() - 1`
/// entries. Units: milliseconds, decimeters, decimeters per second.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ShapeAttributes {
    pub time: Vec<u32>,
    pub length: Vec<u32>,
    pub speed: Vec<u32>,
}

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_ll: LatLng,
    pub max_ll: LatLng,
}

impl BoundingBox {
    pub fn of(shape: &[LatLng]) -> BoundingBox {
        let mut bbox = BoundingBox {
            min_ll: LatLng::new(f64::MAX, f64::MAX),
            max_ll: LatLng::new(f64::MIN, f64::MIN),
        };
        for point in shape {
            bbox.min_ll.lat = bbox.min_ll.lat.min(point.lat);
            bbox.min_ll.lng = bbox.min_ll.lng.min(point.lng);
            bbox.max_ll.lat = bbox.max_ll.lat.max(point.lat);
            bbox.max_ll.lng = bbox.max_ll.lng.max(point.lng);
        }
        bbox
    }
}

/// A fully annotated trip leg.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TripLeg {
    /// Origin, throughs, destination, with candidates pruned to the path.
    pub locations: Vec<Location>,
    pub nodes: Vec<LegNode>,
    pub admins: Vec<Admin>,
    /// Polyline-encoded shape.
    pub shape: Option<String>,
    pub bbox: Option<BoundingBox>,
    pub shape_attributes: Option<ShapeAttributes>,
    pub osm_changeset: Option<u64>,
}

impl TripLeg {
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.edge.is_some()).count()
    }

    pub fn edges(&self) -> impl Iterator<Item = &LegEdge> {
        self.nodes.iter().filter_map(|node| node.edge.as_ref())
    }
}
