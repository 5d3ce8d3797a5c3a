use serde::{Deserialize, Serialize};

use crate::graph::GraphId;
use crate::latlng::LatLng;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SideOfStreet {
    #[default]
    None,
    Left,
    Right,
}

impl SideOfStreet {
    pub fn flipped(self) -> SideOfStreet {
        match self {
            SideOfStreet::Left => SideOfStreet::Right,
            SideOfStreet::Right => SideOfStreet::Left,
            SideOfStreet::None => SideOfStreet::None,
        }
    }
}

/// One candidate edge a location snapped to during correlation.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct PathEdgeCandidate {
    pub edge_id: GraphId,
    /// Fraction along the edge where the location projects, in [0, 1].
    pub percent_along: f32,
    pub side_of_street: SideOfStreet,
    /// Snapped point on the edge.
    pub ll: LatLng,
}

/// A user-supplied waypoint: origin, through point, or destination.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Location {
    pub latlng: LatLng,
    pub name: Option<String>,
    /// Local departure date-time at this location, `YYYY-MM-DDTHH:MM`.
    pub date_time: Option<String>,
    pub side_of_street: SideOfStreet,
    /// Projection of the location onto the edge actually used.
    pub projected_ll: Option<LatLng>,
    pub candidates: Vec<PathEdgeCandidate>,
}

impl Location {
    pub fn at(latlng: LatLng) -> Location {
        Location {
            latlng,
            ..Default::default()
        }
    }
}
