//! Polyline representation for route geometries.
//!
//! Providers ship geometries in the encoded polyline format (precision 5).
//! Decoding happens once at the provider boundary; the rest of the crate
//! works with [`Waypoint`] sequences.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Waypoint;

const PRECISION: f64 = 1e5;

/// A route geometry as decoded (latitude, longitude) points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

/// A malformed encoded polyline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed polyline at byte {position}")]
pub struct DecodeError {
    pub position: usize,
}

impl Polyline {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    pub fn into_waypoints(self) -> Vec<Waypoint> {
        self.points.into_iter().map(Waypoint::from).collect()
    }

    /// Decode an encoded polyline string.
    pub fn decode(encoded: &str) -> Result<Self, DecodeError> {
        let bytes = encoded.as_bytes();
        let mut points = Vec::new();
        let mut index = 0;
        let mut lat: i64 = 0;
        let mut lng: i64 = 0;

        while index < bytes.len() {
            lat = accumulate(lat, bytes, &mut index)?;
            lng = accumulate(lng, bytes, &mut index)?;
            points.push((lat as f64 / PRECISION, lng as f64 / PRECISION));
        }

        Ok(Self { points })
    }

    pub fn encode(&self) -> String {
        let mut out = String::new();
        let mut prev_lat: i64 = 0;
        let mut prev_lng: i64 = 0;

        for &(lat, lng) in &self.points {
            let lat = (lat * PRECISION).round() as i64;
            let lng = (lng * PRECISION).round() as i64;
            encode_value(lat - prev_lat, &mut out);
            encode_value(lng - prev_lng, &mut out);
            prev_lat = lat;
            prev_lng = lng;
        }

        out
    }
}

/// Add the next delta to a running coordinate. Overflow is malformed input.
fn accumulate(current: i64, bytes: &[u8], index: &mut usize) -> Result<i64, DecodeError> {
    let delta = decode_value(bytes, index)?;
    current
        .checked_add(delta)
        .ok_or(DecodeError { position: *index })
}

fn decode_value(bytes: &[u8], index: &mut usize) -> Result<i64, DecodeError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes.get(*index).ok_or(DecodeError { position: *index })?;
        if !(63..127).contains(&byte) || shift > 60 {
            return Err(DecodeError { position: *index });
        }
        let chunk = (byte - 63) as i64;
        *index += 1;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 == 1 { !(result >> 1) } else { result >> 1 })
}

fn encode_value(value: i64, out: &mut String) {
    let mut value = if value < 0 { !(value << 1) } else { value << 1 };
    while value >= 0x20 {
        out.push((((value & 0x1f) | 0x20) as u8 + 63) as char);
        value >>= 5;
    }
    out.push((value as u8 + 63) as char);
}
