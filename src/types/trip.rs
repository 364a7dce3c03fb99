//! Trip planning request/response types

use serde::{Deserialize, Serialize};

use super::{DayLog, RouteSummary, Stop};

/// Trip planning request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    pub current_location: String,
    pub pickup_location: String,
    pub dropoff_location: String,
    /// Hours already used in the current 8-day cycle
    #[serde(default)]
    pub current_cycle_hours: f64,
}

/// Trip planning result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripPlan {
    pub route: RouteSummary,
    pub stops: Vec<Stop>,
    pub logs: Vec<DayLog>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_request_cycle_hours_default_to_zero() {
        let json = r#"{
            "current_location": "Chicago, IL",
            "pickup_location": "Indianapolis, IN",
            "dropoff_location": "Dallas, TX"
        }"#;

        let request: TripRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.current_location, "Chicago, IL");
        assert_eq!(request.current_cycle_hours, 0.0);
    }
}
