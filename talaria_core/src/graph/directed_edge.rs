use serde::{Deserialize, Serialize};

use super::GraphId;

/// Road importance within the hierarchy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoadClass {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Unclassified,
    #[default]
    Residential,
    ServiceOther,
}

/// Specialized edge use.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeUse {
    #[default]
    Road,
    Ramp,
    TurnChannel,
    Track,
    Driveway,
    Alley,
    ParkingAisle,
    EmergencyAccess,
    DriveThru,
    Culdesac,
    LivingStreet,
    ServiceRoad,
    Cycleway,
    MountainBike,
    Sidewalk,
    Footway,
    Steps,
    Path,
    Pedestrian,
    Bridleway,
    PedestrianCrossing,
    Elevator,
    Escalator,
    Platform,
    RestArea,
    ServiceArea,
    Other,
    Ferry,
    RailFerry,
    Construction,
    Rail,
    Bus,
    EgressConnection,
    PlatformConnection,
    TransitConnection,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    #[default]
    PavedSmooth,
    Paved,
    PavedRough,
    Compacted,
    Dirt,
    Gravel,
    Path,
    Impassable,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleLane {
    #[default]
    None,
    Shared,
    Dedicated,
    Separated,
}

/// Directed edge within a tile. Each physical road segment has two, one per
/// direction; `forward` tells whether this one follows the shape orientation
/// stored in the edge info.
#[derive(Clone, Debug, Default)]
pub struct DirectedEdge {
    pub end_node: GraphId,
    /// Length in meters.
    pub length: u32,
    /// Index of this edge's [`super::EdgeInfo`] within the tile.
    pub edge_info_index: u32,
    /// Index of the opposing edge among the end node's outgoing edges.
    pub opposing_index: u32,
    /// Local (level-2) index of the opposing edge at the end node.
    pub opposing_local_index: u32,
    /// Local index of this edge among the start node's outgoing edges.
    pub local_edge_index: u32,
    pub forward: bool,
    pub road_class: RoadClass,
    pub use_type: EdgeUse,
    pub surface: Surface,
    pub cycle_lane: CycleLane,
    pub forward_access: u16,
    pub reverse_access: u16,
    /// Default speed in km/h.
    pub speed: u32,
    pub truck_speed: u32,
    pub lane_count: u32,
    /// Relative road density at the edge, 0-15.
    pub density: u32,
    /// Raw weighted grade, 0-15; decode with `(raw - 6) / 0.6`.
    pub weighted_grade: u32,
    pub max_up_slope: f32,
    pub max_down_slope: f32,
    pub bike_network: u8,
    /// Transit line id (0 for non-transit edges).
    pub line_id: u32,

    pub toll: bool,
    pub tunnel: bool,
    pub bridge: bool,
    pub roundabout: bool,
    pub internal_intersection: bool,
    pub destination_only: bool,
    pub unpaved: bool,
    pub dismount: bool,
    pub sidewalk_left: bool,
    pub sidewalk_right: bool,
    pub truck_route: bool,

    pub has_sign: bool,
    pub has_turn_lanes: bool,
    pub has_lane_connectivity: bool,
    pub has_access_restriction: bool,
    pub has_end_restriction: bool,

    pub is_shortcut: bool,
    /// Mask identifying this shortcut among the shortcuts at its start node.
    pub shortcut_mask: u32,
    /// Mask of shortcuts at the start node that supersede this edge.
    pub superseded_mask: u32,
    pub leaves_tile: bool,
    /// Per-local-edge-index name consistency with this edge.
    pub name_consistency_mask: u8,
}

impl DirectedEdge {
    pub fn is_transit_line(&self) -> bool {
        matches!(self.use_type, EdgeUse::Rail | EdgeUse::Bus)
    }

    /// Whether the edge at `local_index` shares a name with this edge.
    pub fn name_consistency(&self, local_index: u32) -> bool {
        local_index < 8 && self.name_consistency_mask & (1 << local_index) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transit_lines() {
        let mut edge = DirectedEdge {
            use_type: EdgeUse::Rail,
            ..Default::default()
        };
        assert!(edge.is_transit_line());
        edge.use_type = EdgeUse::Bus;
        assert!(edge.is_transit_line());
        edge.use_type = EdgeUse::PlatformConnection;
        assert!(!edge.is_transit_line());
    }

    #[test]
    fn name_consistency_by_local_index() {
        let edge = DirectedEdge {
            name_consistency_mask: 0b0000_0101,
            ..Default::default()
        };
        assert!(edge.name_consistency(0));
        assert!(!edge.name_consistency(1));
        assert!(edge.name_consistency(2));
        assert!(!edge.name_consistency(9));
    }
}
