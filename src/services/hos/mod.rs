//! Hours-of-Service timeline simulation
//!
//! Turns a route's driving time, the drive to the pickup and the driver's
//! used cycle hours into day-by-day ELD logs. The simulation is a loop over
//! an explicit [`SimulatorState`]: each step is a pure function returning the
//! next state together with the logs it produced.

mod clock;
mod error;
pub mod rules;
mod state;
mod template;

pub use error::PlanError;
pub use rules::HosRules;
pub use state::{DayPlan, SimulatorState, TripProfile};
pub use template::DayTemplate;

use tracing::{debug, warn};

use crate::types::{DayLog, RoutePlan};
use clock::DayClock;
use rules::METERS_TO_MILES;

/// Simulates the duty-status timeline of one trip
#[derive(Debug, Clone)]
pub struct HosSimulator {
    profile: TripProfile,
    initial: SimulatorState,
    rules: HosRules,
}

impl HosSimulator {
    /// Validate inputs and derive the trip profile
    ///
    /// `route` covers current location -> pickup -> dropoff, `pickup_route`
    /// current location -> pickup only.
    pub fn new(
        route: &RoutePlan,
        pickup_route: &RoutePlan,
        cycle_used_hours: f64,
        rules: HosRules,
    ) -> Result<Self, PlanError> {
        rules.validate()?;

        if !cycle_used_hours.is_finite() || cycle_used_hours < 0.0 {
            return Err(PlanError::NegativeCycleHours(cycle_used_hours));
        }
        if !route.distance.is_finite() || route.distance < 0.0 {
            return Err(PlanError::InvalidRoute(format!("distance {} m", route.distance)));
        }
        if !route.duration.is_finite() || route.duration < 0.0 {
            return Err(PlanError::InvalidRoute(format!("duration {} s", route.duration)));
        }
        if !pickup_route.duration.is_finite() || pickup_route.duration < 0.0 {
            return Err(PlanError::InvalidRoute(format!(
                "pickup leg duration {} s",
                pickup_route.duration
            )));
        }

        let driving_hours = route.duration_hours();
        if driving_hours <= 0.0 {
            return Err(PlanError::ZeroDrivingDuration);
        }

        let distance_miles = route.distance * METERS_TO_MILES;
        let mut hours_to_pickup = pickup_route.duration_hours();
        if hours_to_pickup > driving_hours {
            warn!(
                "Pickup leg ({:.2}h) is longer than the whole route ({:.2}h), capping",
                hours_to_pickup, driving_hours
            );
            hours_to_pickup = driving_hours;
        }

        let profile = TripProfile {
            driving_hours,
            distance_miles,
            average_speed_mph: distance_miles / driving_hours,
            total_trip_hours: driving_hours + rules.trip_allowance_hours(),
            hours_to_pickup,
        };
        let initial = SimulatorState::initial(&profile, cycle_used_hours, &rules);

        Ok(Self { profile, initial, rules })
    }

    pub fn profile(&self) -> &TripProfile {
        &self.profile
    }

    pub fn initial_state(&self) -> &SimulatorState {
        &self.initial
    }

    /// Run the simulation to the end of the trip
    pub fn simulate(&self) -> Vec<DayLog> {
        debug!(
            "Simulating {:.2}h of driving ({:.1} mi at {:.1} mph) under {}",
            self.profile.driving_hours,
            self.profile.distance_miles,
            self.profile.average_speed_mph,
            self.rules.version
        );

        let mut logs = Vec::new();
        let mut state = self.initial;

        while !state.is_complete() {
            if state.day > self.rules.max_days {
                warn!(
                    "Stopping simulation after {} days with {:.2}h of trip left",
                    self.rules.max_days, state.remaining_trip_hours
                );
                break;
            }

            if state.needs_cycle_reset(&self.rules) {
                let (next, reset_days) = reset_cycle(state, &self.profile, &self.rules);
                logs.extend(reset_days);
                state = next;
                continue;
            }

            let (next, log) = run_day(state, &self.profile, &self.rules);
            logs.push(log);
            state = next;
        }

        debug!("Simulation produced {} day logs", logs.len());
        logs
    }
}

/// Simulate one driving day
pub fn run_day(state: SimulatorState, profile: &TripProfile, rules: &HosRules) -> (SimulatorState, DayLog) {
    let plan = state.plan_day(rules);
    let template = DayTemplate::select(&state, Some(&plan));

    let mut clock = DayClock::new();
    template.apply(&plan, rules, &mut clock);
    let log = clock.into_log(state.day, profile.average_speed_mph);

    debug!(
        "Day {} ({:?}): {:.2}h driving, {:.2}h cycle left before the day",
        state.day, template, log.driving_hours, state.cycle_available_hours
    );

    (state.after_day(&plan, rules), log)
}

/// Take the two full days off that restore the cycle limit
pub fn reset_cycle(state: SimulatorState, profile: &TripProfile, rules: &HosRules) -> (SimulatorState, Vec<DayLog>) {
    debug!(
        "Day {}: {:.2}h of cycle left, restarting cycle",
        state.day, state.cycle_available_hours
    );

    let template = DayTemplate::select(&state, None);
    let placeholder = DayPlan {
        pickup: None,
        before_break: None,
        after_break: None,
        completes_trip: false,
    };

    let logs = (0..2)
        .map(|offset| {
            let mut clock = DayClock::new();
            template.apply(&placeholder, rules, &mut clock);
            clock.into_log(state.day + offset, profile.average_speed_mph)
        })
        .collect();

    (state.after_reset(rules), logs)
}
