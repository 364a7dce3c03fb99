//! Location types

use serde::{Deserialize, Serialize};

/// Geographic point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Linear interpolation towards `to`, `fraction` in [0, 1]
    pub fn lerp(&self, to: &Coordinates, fraction: f64) -> Coordinates {
        Coordinates {
            lat: self.lat + fraction * (to.lat - self.lat),
            lng: self.lng + fraction * (to.lng - self.lng),
        }
    }
}
