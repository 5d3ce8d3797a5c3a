use serde::{Deserialize, Serialize};

const EARTH_RADIUS: f64 = 6_371_000.0;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> LatLng {
        LatLng { lat, lng }
    }

    pub fn haversine_distance(&self, other: &LatLng) -> f64 {
        let lat1 = self.lat.to_radians();
        let lng1 = self.lng.to_radians();
        let lat2 = other.lat.to_radians();
        let lng2 = other.lng.to_radians();

        let dlat = lat2 - lat1;
        let dlng = lng2 - lng1;

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS * c
    }

    /// Point at `fraction` along the segment from `self` to `other`.
    pub fn point_along_segment(&self, other: &LatLng, fraction: f64) -> LatLng {
        LatLng {
            lat: self.lat + (other.lat - self.lat) * fraction,
            lng: self.lng + (other.lng - self.lng) * fraction,
        }
    }

    /// Initial bearing from `self` towards `other`, degrees in [0, 360).
    pub fn heading_to(&self, other: &LatLng) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlng = (other.lng - self.lng).to_radians();

        let y = dlng.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlng.cos();

        (y.atan2(x).to_degrees() + 360.0) % 360.0
    }
}

pub fn polyline_length(points: &[LatLng]) -> f64 {
    let mut distance = 0.0;
    for segment in points.windows(2) {
        distance += segment[0].haversine_distance(&segment[1]);
    }
    distance
}

/// Heading at the start of a polyline slice, measured over the first
/// `offset` meters so short jogs at the vertex do not dominate. The target
/// is interpolated at exactly `offset` meters along the crossing segment.
pub fn heading_along_polyline(shape: &[LatLng], offset: f64, begin: usize, end: usize) -> f64 {
    let begin = begin.min(shape.len() - 1);
    let end = end.min(shape.len() - 1);
    if begin >= end {
        return 0.0;
    }

    let mut walked = 0.0;
    let mut target = shape[end];
    for i in begin..end {
        let segment = shape[i].haversine_distance(&shape[i + 1]);
        if walked + segment >= offset {
            let fraction = if segment > 0.0 {
                (offset - walked) / segment
            } else {
                0.0
            };
            target = shape[i].point_along_segment(&shape[i + 1], fraction);
            break;
        }
        walked += segment;
    }
    shape[begin].heading_to(&target)
}

/// Heading approaching the end of a polyline slice, measured over the last
/// `offset` meters. The source is interpolated at exactly `offset` meters
/// back from the end.
pub fn heading_at_end_of_polyline(shape: &[LatLng], offset: f64, begin: usize, end: usize) -> f64 {
    let begin = begin.min(shape.len() - 1);
    let end = end.min(shape.len() - 1);
    if begin >= end {
        return 0.0;
    }

    let mut walked = 0.0;
    let mut source = shape[begin];
    for i in (begin..end).rev() {
        let segment = shape[i].haversine_distance(&shape[i + 1]);
        if walked + segment >= offset {
            let fraction = if segment > 0.0 {
                (offset - walked) / segment
            } else {
                0.0
            };
            source = shape[i + 1].point_along_segment(&shape[i], fraction);
            break;
        }
        walked += segment;
    }
    source.heading_to(&shape[end])
}
