//! Per-day event accumulator

use crate::types::{DayLog, DutyStatus, DutyStatusEvent};

/// Builds one day's timeline, keeping events contiguous from midnight
#[derive(Debug, Default)]
pub struct DayClock {
    now: f64,
    off_duty: f64,
    sleeper_berth: f64,
    driving: f64,
    on_duty: f64,
    events: Vec<DutyStatusEvent>,
}

impl DayClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hours since midnight covered so far
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn driving_hours(&self) -> f64 {
        self.driving
    }

    /// Append an event starting where the previous one ended
    pub fn record(&mut self, status: DutyStatus, hours: f64, activity: impl Into<String>) {
        let hours = hours.max(0.0);

        self.events.push(DutyStatusEvent {
            status,
            start: self.now,
            end: self.now + hours,
            activity: activity.into(),
        });

        match status {
            DutyStatus::OffDuty => self.off_duty += hours,
            DutyStatus::SleeperBerth => self.sleeper_berth += hours,
            DutyStatus::Driving => self.driving += hours,
            DutyStatus::OnDuty => self.on_duty += hours,
        }

        self.now += hours;
    }

    /// Close the day into a log with totals rounded to hundredths
    pub fn into_log(self, day: u32, speed_mph: f64) -> DayLog {
        DayLog {
            day,
            off_duty_hours: round2(self.off_duty),
            sleeper_berth_hours: round2(self.sleeper_berth),
            driving_hours: round2(self.driving),
            on_duty_hours: round2(self.on_duty),
            total_on_duty: round2(self.driving + self.on_duty),
            daily_distance_miles: round2(self.driving * speed_mph),
            duty_status_timeline: self.events,
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
