//! Trip waypoint types

use serde::{Deserialize, Serialize};

use super::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopKind {
    Current,
    Pickup,
    Fuel,
    Dropoff,
}

impl StopKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            StopKind::Current => "current",
            StopKind::Pickup => "pickup",
            StopKind::Fuel => "fuel",
            StopKind::Dropoff => "dropoff",
        }
    }
}

/// A waypoint on the trip
///
/// Exactly one of `coords` and `progress` is set. `progress` is the fallback
/// for fuel stops whose position could not be resolved from route geometry:
/// the fraction (0-1) of the total route distance at which the stop lies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    #[serde(rename = "type")]
    pub kind: StopKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coords: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    pub label: String,
}

impl Stop {
    pub fn at(kind: StopKind, coords: Coordinates, label: impl Into<String>) -> Self {
        Self {
            kind,
            coords: Some(coords),
            progress: None,
            label: label.into(),
        }
    }

    pub fn at_progress(kind: StopKind, progress: f64, label: impl Into<String>) -> Self {
        Self {
            kind,
            coords: None,
            progress: Some(progress),
            label: label.into(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.coords.is_some()
    }
}
