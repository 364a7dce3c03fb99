//! Simulator state and the per-day driving plan derived from it

use super::rules::HosRules;

/// Tolerance for comparing accumulated hours
pub const EPSILON: f64 = 1e-9;

/// Read-only facts about the trip, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripProfile {
    /// Driving time of the whole route
    pub driving_hours: f64,
    pub distance_miles: f64,
    pub average_speed_mph: f64,
    /// Driving plus the pickup and dropoff allowance
    pub total_trip_hours: f64,
    /// Driving time from the current location to the pickup
    pub hours_to_pickup: f64,
}

/// Counters carried from one simulated day to the next
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatorState {
    /// Trip hours (driving plus pickup/dropoff) not yet logged
    pub remaining_trip_hours: f64,
    pub cycle_available_hours: f64,
    /// 1-based calendar day of the next log
    pub day: u32,
    /// Position within the cycle window
    pub cycle_day: u32,
    /// Driving left before the pickup can be reached
    pub hours_to_pickup: f64,
    pub pickup_done: bool,
}

impl SimulatorState {
    pub fn initial(profile: &TripProfile, cycle_used_hours: f64, rules: &HosRules) -> Self {
        Self {
            remaining_trip_hours: profile.total_trip_hours,
            cycle_available_hours: (rules.cycle_limit_hours - cycle_used_hours).max(0.0),
            day: 1,
            cycle_day: 1,
            hours_to_pickup: profile.hours_to_pickup,
            pickup_done: false,
        }
    }

    /// Pickup/dropoff hours not yet spent
    pub fn outstanding_allowance_hours(&self, rules: &HosRules) -> f64 {
        let pickup = if self.pickup_done { 0.0 } else { rules.pickup_hours };
        pickup + rules.dropoff_hours
    }

    /// Driving still required to finish the route
    pub fn remaining_driving_hours(&self, rules: &HosRules) -> f64 {
        (self.remaining_trip_hours - self.outstanding_allowance_hours(rules)).max(0.0)
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_trip_hours <= EPSILON
    }

    /// Pickup has not happened yet and can be reached within today's driving limit
    pub fn pickup_due(&self, rules: &HosRules) -> bool {
        !self.pickup_done && self.hours_to_pickup <= rules.daily_driving_hours
    }

    /// Not enough cycle hours left to drive today
    pub fn needs_cycle_reset(&self, rules: &HosRules) -> bool {
        let needed = self
            .remaining_driving_hours(rules)
            .min(rules.daily_driving_hours);
        self.cycle_available_hours < needed
    }

    /// Work out today's driving segments
    ///
    /// The drive to the pickup is split at the continuous-driving limit.
    /// Main driving runs up to that limit, takes the break, then continues up
    /// to the daily limit; it stops as soon as the route is covered.
    pub fn plan_day(&self, rules: &HosRules) -> DayPlan {
        let remaining = self.remaining_driving_hours(rules);
        let mut driven = 0.0;

        let pickup = if self.pickup_due(rules) {
            let to_pickup = self.hours_to_pickup.max(0.0);
            let first = to_pickup.min(rules.driving_before_break_hours);
            let rest = (to_pickup > rules.driving_before_break_hours)
                .then(|| to_pickup - rules.driving_before_break_hours);
            driven += to_pickup;
            Some(PickupDrive { first, rest })
        } else {
            None
        };

        let before_break = (driven < remaining - EPSILON).then(|| {
            (remaining - driven)
                .min(rules.driving_before_break_hours - driven)
                .max(0.0)
        });
        driven += before_break.unwrap_or(0.0);

        let after_break = (before_break.is_some() && driven < remaining - EPSILON).then(|| {
            (remaining - driven)
                .min(rules.daily_driving_hours - driven)
                .max(0.0)
        });
        driven += after_break.unwrap_or(0.0);

        DayPlan {
            pickup,
            before_break,
            after_break,
            completes_trip: driven >= remaining - EPSILON,
        }
    }

    /// State after a driving day described by `plan`
    pub fn after_day(&self, plan: &DayPlan, rules: &HosRules) -> Self {
        let driven = plan.driving_hours();
        let pickup_done = self.pickup_done || plan.pickup.is_some();

        let remaining_trip_hours = if plan.completes_trip {
            0.0
        } else {
            let pickup = if plan.pickup.is_some() { rules.pickup_hours } else { 0.0 };
            self.remaining_trip_hours - driven - pickup
        };

        let hours_to_pickup = if pickup_done {
            self.hours_to_pickup
        } else {
            self.hours_to_pickup - driven
        };

        let cycle_day = self.cycle_day + 1;
        let mut cycle_available_hours = self.cycle_available_hours - driven;
        if cycle_day >= rules.cycle_days {
            // Rolling-window approximation: one day's cap comes back per day past the window
            cycle_available_hours += rules.daily_driving_hours;
        }

        Self {
            remaining_trip_hours,
            cycle_available_hours,
            day: self.day + 1,
            cycle_day,
            hours_to_pickup,
            pickup_done,
        }
    }

    /// State after the two-day cycle restart
    pub fn after_reset(&self, rules: &HosRules) -> Self {
        Self {
            cycle_available_hours: rules.cycle_limit_hours,
            day: self.day + 2,
            cycle_day: 0,
            ..*self
        }
    }
}

/// Drive to the pickup, split around the mandatory break
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickupDrive {
    pub first: f64,
    /// Driving after the break, when the pickup is beyond the continuous limit
    pub rest: Option<f64>,
}

impl PickupDrive {
    pub fn hours(&self) -> f64 {
        self.first + self.rest.unwrap_or(0.0)
    }
}

/// Driving segments of one day
///
/// `None` means the segment (and everything after it in the driving block)
/// is skipped because the route is already covered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayPlan {
    pub pickup: Option<PickupDrive>,
    pub before_break: Option<f64>,
    pub after_break: Option<f64>,
    pub completes_trip: bool,
}

impl DayPlan {
    pub fn driving_hours(&self) -> f64 {
        self.pickup.map(|p| p.hours()).unwrap_or(0.0)
            + self.before_break.unwrap_or(0.0)
            + self.after_break.unwrap_or(0.0)
    }
}
