//! Route types
//!
//! Mirrors the shape of an OSRM route object so a routing response can be
//! deserialized directly. Distances are in meters, durations in seconds.

use serde::{Deserialize, Deserializer, Serialize};

/// One maneuver segment of a leg
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteStep {
    #[serde(default, deserialize_with = "lenient_meters")]
    pub distance: f64,
    /// Encoded polyline (precision 5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,
}

/// Part of a route between two consecutive waypoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteLeg {
    #[serde(default, deserialize_with = "lenient_meters")]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub steps: Vec<RouteStep>,
}

/// A complete route through all requested waypoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutePlan {
    #[serde(default, deserialize_with = "lenient_meters")]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
    /// Overview geometry of the whole route, if requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

impl RoutePlan {
    pub fn duration_hours(&self) -> f64 {
        self.duration / 3600.0
    }
}

/// Route summary returned to clients alongside the logs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSummary {
    pub distance_m: f64,
    pub duration_s: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

impl From<&RoutePlan> for RouteSummary {
    fn from(route: &RoutePlan) -> Self {
        Self {
            distance_m: route.distance,
            duration_s: route.duration,
            geometry: route.geometry.clone(),
            legs: route.legs.clone(),
        }
    }
}

/// Treat null, negative and non-finite distances as zero
fn lenient_meters<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = Option::deserialize(deserializer)?;
    Ok(value.filter(|d| d.is_finite() && *d > 0.0).unwrap_or(0.0))
}
