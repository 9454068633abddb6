//! Geographic primitives: validated coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

use crate::error::FareError;

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in signed decimal degrees.
///
/// Construction validates the ranges, so every `Coordinate` in the program is
/// known to be on the globe. On the wire it is the array `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Result<Self, FareError> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        if valid {
            Ok(Self { lat, lng })
        } else {
            Err(FareError::InvalidCoordinate { lat, lng })
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Integer cache key with `decimals` places kept (e.g. 4 → ~11 m).
    pub(crate) fn rounded_key(&self, decimals: u32) -> (i64, i64) {
        let scale = 10_f64.powi(decimals as i32);
        (
            (self.lat * scale).round() as i64,
            (self.lng * scale).round() as i64,
        )
    }
}

impl TryFrom<[f64; 2]> for Coordinate {
    type Error = FareError;

    fn try_from(value: [f64; 2]) -> Result<Self, Self::Error> {
        Coordinate::new(value[0], value[1])
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(value: Coordinate) -> Self {
        [value.lat, value.lng]
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

/// Haversine great-circle distance in kilometres.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lng.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lng.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = (sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon).clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}
