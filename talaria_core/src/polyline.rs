//! Polyline codec for route geometries. Shapes stay decoded (`Vec<LatLng>`)
//! inside the builder; encoding happens once, at the leg boundary.

use crate::latlng::LatLng;

const PRECISION: f64 = 1e6;

fn encode_number(number: i64, output: &mut String) {
    let mut value = number << 1;
    if number < 0 {
        value = !value;
    }
    while value >= 0x20 {
        output.push(((0x20 | (value & 0x1f)) as u8 + 63) as char);
        value >>= 5;
    }
    output.push((value as u8 + 63) as char);
}

/// Encodes a shape with the standard polyline algorithm at 1e-6 precision
/// (the "polyline6" variant used for route shapes).
pub fn encode(shape: &[LatLng]) -> String {
    let mut output = String::with_capacity(shape.len() * 6);
    let mut prev_lat = 0i64;
    let mut prev_lng = 0i64;

    for point in shape {
        let lat = (point.lat * PRECISION).round() as i64;
        let lng = (point.lng * PRECISION).round() as i64;
        encode_number(lat - prev_lat, &mut output);
        encode_number(lng - prev_lng, &mut output);
        prev_lat = lat;
        prev_lng = lng;
    }

    output
}

pub fn decode(encoded: &str) -> Vec<LatLng> {
    let bytes = encoded.as_bytes();
    let mut shape = Vec::new();
    let mut index = 0;
    let mut lat = 0i64;
    let mut lng = 0i64;

    let mut next_number = |index: &mut usize| -> i64 {
        let mut result = 0i64;
        let mut shift = 0;
        loop {
            let byte = (bytes[*index] as i64) - 63;
            *index += 1;
            result |= (byte & 0x1f) << shift;
            shift += 5;
            if byte < 0x20 {
                break;
            }
        }
        if result & 1 != 0 {
            !(result >> 1)
        } else {
            result >> 1
        }
    };

    while index < bytes.len() {
        lat += next_number(&mut index);
        lng += next_number(&mut index);
        shape.push(LatLng::new(lat as f64 / PRECISION, lng as f64 / PRECISION));
    }

    shape
}
