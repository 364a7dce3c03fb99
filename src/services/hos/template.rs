//! Day templates
//!
//! Every simulated day follows one named template: a fixed, ordered list of
//! event steps. The template is picked from the simulator state; steps read
//! their durations from the day's [`DayPlan`] and the rules, and a step with
//! nothing to log for that plan is skipped.

use crate::types::DutyStatus;

use super::clock::DayClock;
use super::rules::HosRules;
use super::state::{DayPlan, SimulatorState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayTemplate {
    /// First day of the trip: the clock starts in an off-duty rest
    StartOfTrip,
    /// Later day on which the pickup becomes reachable
    PickupDay,
    /// Driving day ending in the sleeper berth
    RegularDay,
    /// Day that covers the rest of the route and ends with the dropoff
    FinalDay,
    /// Full day off duty restarting the cycle
    Reset,
}

/// One event builder in a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStep {
    /// Rest from midnight until the driver starts
    OpeningRest(DutyStatus),
    PreTripInspection,
    DriveToPickup,
    /// Break inside a pickup drive longer than the continuous limit
    PickupDrivingBreak,
    DriveToPickupAfterBreak,
    Pickup,
    DriveBeforeBreak,
    DrivingBreak,
    DriveAfterBreak,
    PostTripInspection,
    Dropoff,
    /// Dropoff if the day completes the trip, post-trip inspection otherwise
    EndOfDuty,
    EndOfDayRest,
    /// Sleeper berth until midnight
    CloseInBerth,
    /// Off duty until midnight, trip finished
    CloseTripDone,
    /// Either closing, depending on whether the day completes the trip
    CloseDay,
    FullDayOff,
}

use EventStep::*;

const START_OF_TRIP: &[EventStep] = &[
    OpeningRest(DutyStatus::OffDuty),
    PreTripInspection,
    DriveToPickup,
    PickupDrivingBreak,
    DriveToPickupAfterBreak,
    Pickup,
    DriveBeforeBreak,
    DrivingBreak,
    DriveAfterBreak,
    EndOfDuty,
    EndOfDayRest,
    CloseDay,
];

const PICKUP_DAY: &[EventStep] = &[
    OpeningRest(DutyStatus::SleeperBerth),
    PreTripInspection,
    DriveToPickup,
    PickupDrivingBreak,
    DriveToPickupAfterBreak,
    Pickup,
    DriveBeforeBreak,
    DrivingBreak,
    DriveAfterBreak,
    EndOfDuty,
    EndOfDayRest,
    CloseDay,
];

const REGULAR_DAY: &[EventStep] = &[
    OpeningRest(DutyStatus::SleeperBerth),
    PreTripInspection,
    DriveBeforeBreak,
    DrivingBreak,
    DriveAfterBreak,
    PostTripInspection,
    EndOfDayRest,
    CloseInBerth,
];

const FINAL_DAY: &[EventStep] = &[
    OpeningRest(DutyStatus::SleeperBerth),
    PreTripInspection,
    DriveBeforeBreak,
    DrivingBreak,
    DriveAfterBreak,
    Dropoff,
    EndOfDayRest,
    CloseTripDone,
];

const RESET: &[EventStep] = &[FullDayOff];

impl DayTemplate {
    /// Pick the template for the next day
    ///
    /// `plan` is `None` when the day cannot be driven at all.
    pub fn select(state: &SimulatorState, plan: Option<&DayPlan>) -> Self {
        let Some(plan) = plan else {
            return DayTemplate::Reset;
        };

        if state.day == 1 {
            DayTemplate::StartOfTrip
        } else if plan.pickup.is_some() {
            DayTemplate::PickupDay
        } else if plan.completes_trip {
            DayTemplate::FinalDay
        } else {
            DayTemplate::RegularDay
        }
    }

    pub fn steps(self) -> &'static [EventStep] {
        match self {
            DayTemplate::StartOfTrip => START_OF_TRIP,
            DayTemplate::PickupDay => PICKUP_DAY,
            DayTemplate::RegularDay => REGULAR_DAY,
            DayTemplate::FinalDay => FINAL_DAY,
            DayTemplate::Reset => RESET,
        }
    }

    /// Log every step of the template onto `clock`
    pub fn apply(self, plan: &DayPlan, rules: &HosRules, clock: &mut DayClock) {
        for step in self.steps() {
            if let Some((status, hours, activity)) = step.build(plan, rules, clock.now()) {
                clock.record(status, hours, activity);
            }
        }
    }
}

impl EventStep {
    /// Event this step contributes, if any, given the time already logged today
    pub fn build(self, plan: &DayPlan, rules: &HosRules, now: f64) -> Option<(DutyStatus, f64, String)> {
        let break_label = || {
            format!(
                "Off duty, {} hours driving break ({})",
                rules.driving_before_break_hours,
                describe_hours(rules.break_hours)
            )
        };

        match self {
            OpeningRest(status) => {
                let label = match status {
                    DutyStatus::SleeperBerth => "Sleeper berth",
                    _ => "Off duty",
                };
                Some((status, rules.start_of_day_rest_hours, label.to_string()))
            }
            PreTripInspection => Some((
                DutyStatus::OnDuty,
                rules.inspection_hours,
                format!("Pre-Trip/TIV ({})", describe_hours(rules.inspection_hours)),
            )),
            DriveToPickup => plan
                .pickup
                .map(|p| (DutyStatus::Driving, p.first, "Driving to pickup".to_string())),
            PickupDrivingBreak => plan
                .pickup
                .and_then(|p| p.rest)
                .map(|_| (DutyStatus::OffDuty, rules.break_hours, break_label())),
            DriveToPickupAfterBreak => plan
                .pickup
                .and_then(|p| p.rest)
                .map(|rest| (DutyStatus::Driving, rest, "Driving to pickup".to_string())),
            Pickup => plan.pickup.map(|_| {
                (
                    DutyStatus::OnDuty,
                    rules.pickup_hours,
                    format!("Pickup ({})", describe_hours(rules.pickup_hours)),
                )
            }),
            DriveBeforeBreak => plan
                .before_break
                .filter(|h| *h > 0.0)
                .map(|h| {
                    (
                        DutyStatus::Driving,
                        h,
                        format!("Driving before {} hours rest", rules.driving_before_break_hours),
                    )
                }),
            DrivingBreak => plan
                .after_break
                .map(|_| (DutyStatus::OffDuty, rules.break_hours, break_label())),
            DriveAfterBreak => plan
                .after_break
                .filter(|h| *h > 0.0)
                .map(|h| {
                    (
                        DutyStatus::Driving,
                        h,
                        format!("Driving after {} hours rest", rules.driving_before_break_hours),
                    )
                }),
            PostTripInspection => Some((
                DutyStatus::OnDuty,
                rules.inspection_hours,
                format!("Post-Trip/TIV ({})", describe_hours(rules.inspection_hours)),
            )),
            Dropoff => Some((
                DutyStatus::OnDuty,
                rules.dropoff_hours,
                format!("Dropoff ({})", describe_hours(rules.dropoff_hours)),
            )),
            EndOfDuty => {
                let step = if plan.completes_trip { Dropoff } else { PostTripInspection };
                step.build(plan, rules, now)
            }
            EndOfDayRest => Some((
                DutyStatus::OffDuty,
                rules.end_of_day_rest_hours,
                format!("Off duty, end day rest ({})", describe_hours(rules.end_of_day_rest_hours)),
            )),
            CloseInBerth => Some((
                DutyStatus::SleeperBerth,
                rules.day_hours - now,
                "Sleeper berth".to_string(),
            )),
            CloseTripDone => Some((
                DutyStatus::OffDuty,
                rules.day_hours - now,
                "Off duty, trip is done".to_string(),
            )),
            CloseDay => {
                let step = if plan.completes_trip { CloseTripDone } else { CloseInBerth };
                step.build(plan, rules, now)
            }
            FullDayOff => Some((
                DutyStatus::OffDuty,
                rules.day_hours,
                "Off duty, cycle reset".to_string(),
            )),
        }
    }
}

/// "30 min", "1 hour", "1.5 hours"
pub fn describe_hours(hours: f64) -> String {
    if hours < 1.0 {
        format!("{} min", (hours * 60.0).round())
    } else if (hours - 1.0).abs() < f64::EPSILON {
        "1 hour".to_string()
    } else {
        format!("{} hours", hours)
    }
}
