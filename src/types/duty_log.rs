//! Duty status log types (ELD output)

use serde::{Deserialize, Serialize};

/// Driver duty status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DutyStatus {
    #[serde(rename = "Off Duty")]
    OffDuty,
    #[serde(rename = "Sleeper Berth")]
    SleeperBerth,
    #[serde(rename = "Driving")]
    Driving,
    #[serde(rename = "On Duty")]
    OnDuty,
}

impl DutyStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            DutyStatus::OffDuty => "Off Duty",
            DutyStatus::SleeperBerth => "Sleeper Berth",
            DutyStatus::Driving => "Driving",
            DutyStatus::OnDuty => "On Duty",
        }
    }
}

/// One contiguous block of a single duty status within a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyStatusEvent {
    pub status: DutyStatus,
    /// Hours since midnight
    pub start: f64,
    /// Hours since midnight, `end >= start`
    pub end: f64,
    pub activity: String,
}

impl DutyStatusEvent {
    pub fn hours(&self) -> f64 {
        self.end - self.start
    }
}

/// A single calendar day of the driver's log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLog {
    /// 1-based, includes cycle reset days
    pub day: u32,
    pub off_duty_hours: f64,
    pub sleeper_berth_hours: f64,
    pub driving_hours: f64,
    pub on_duty_hours: f64,
    /// Driving plus on-duty (not driving)
    pub total_on_duty: f64,
    pub daily_distance_miles: f64,
    pub duty_status_timeline: Vec<DutyStatusEvent>,
}

impl DayLog {
    /// Sum of the four per-status totals
    pub fn total_hours(&self) -> f64 {
        self.off_duty_hours + self.sleeper_berth_hours + self.driving_hours + self.on_duty_hours
    }

    /// End offset of the last event, 0 for an empty timeline
    pub fn last_end(&self) -> f64 {
        self.duty_status_timeline.last().map(|e| e.end).unwrap_or(0.0)
    }

    pub fn is_rest_day(&self) -> bool {
        self.duty_status_timeline
            .iter()
            .all(|e| e.status == DutyStatus::OffDuty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duty_status_serializes_as_label() {
        let json = serde_json::to_string(&DutyStatus::SleeperBerth).unwrap();
        assert_eq!(json, "\"Sleeper Berth\"");

        let status: DutyStatus = serde_json::from_str("\"On Duty\"").unwrap();
        assert_eq!(status, DutyStatus::OnDuty);
        assert_eq!(status.as_str(), "On Duty");
    }

    #[test]
    fn test_day_log_totals() {
        let log = DayLog {
            day: 1,
            off_duty_hours: 24.0,
            sleeper_berth_hours: 0.0,
            driving_hours: 0.0,
            on_duty_hours: 0.0,
            total_on_duty: 0.0,
            daily_distance_miles: 0.0,
            duty_status_timeline: vec![DutyStatusEvent {
                status: DutyStatus::OffDuty,
                start: 0.0,
                end: 24.0,
                activity: "Off duty, cycle reset".to_string(),
            }],
        };

        assert_eq!(log.total_hours(), 24.0);
        assert_eq!(log.last_end(), 24.0);
        assert!(log.is_rest_day());
    }
}
