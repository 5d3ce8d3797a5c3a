use crate::latlng::LatLng;
use crate::leg::StreetName;

/// Cold edge data shared by both directed edges of a segment: OSM way id,
/// posted limit, elevation, names, and the shape in forward orientation.
#[derive(Clone, Debug, Default)]
pub struct EdgeInfo {
    pub way_id: u64,
    /// Posted speed limit in km/h; 0 when unknown.
    pub speed_limit: u32,
    pub mean_elevation: f32,
    pub names: Vec<StreetName>,
    pub shape: Vec<LatLng>,
}

impl EdgeInfo {
    /// Edge shape oriented to match the given traversal direction.
    pub fn shape_oriented(&self, forward: bool) -> Vec<LatLng> {
        if forward {
            self.shape.clone()
        } else {
            self.shape.iter().rev().copied().collect()
        }
    }
}
