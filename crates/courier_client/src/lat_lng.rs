use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate. On the wire it is always a `[lat, lng]` pair.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    lat: f64,
    lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub const fn lat(&self) -> f64 {
        self.lat
    }

    pub const fn lng(&self) -> f64 {
        self.lng
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(value: LatLng) -> Self {
        [value.lat, value.lng]
    }
}

// geo types are x = longitude, y = latitude
impl From<&LatLng> for geo_types::Point<f64> {
    fn from(value: &LatLng) -> Self {
        geo_types::Point::new(value.lng, value.lat)
    }
}

impl From<&LatLng> for geo_types::Coord<f64> {
    fn from(value: &LatLng) -> Self {
        geo_types::Coord {
            x: value.lng,
            y: value.lat,
        }
    }
}

impl Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[ {}, {} ]", self.lat, self.lng)
    }
}
