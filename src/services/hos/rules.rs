//! Hours-of-Service regulation constants
//!
//! Defaults follow the US FMCSA property-carrying 70-hour/8-day rules. Every
//! value can be overridden from the environment so a different rule set can
//! be rolled out without a rebuild.

use anyhow::{Context, Result};

use super::PlanError;

/// Meters to statute miles
pub const METERS_TO_MILES: f64 = 0.000621371;

/// Meters in one statute mile
pub const METERS_PER_MILE: f64 = 1609.344;

/// Regulation and trip-shape constants used by the simulator and stop planner
#[derive(Debug, Clone, PartialEq)]
pub struct HosRules {
    /// Label of the rule set, reported in logs
    pub version: String,
    /// On-duty hours allowed within the cycle window
    pub cycle_limit_hours: f64,
    /// Length of the rolling cycle window in days
    pub cycle_days: u32,
    /// Maximum driving per day
    pub daily_driving_hours: f64,
    /// Maximum driving before a mandatory break
    pub driving_before_break_hours: f64,
    pub break_hours: f64,
    pub pickup_hours: f64,
    pub dropoff_hours: f64,
    /// Pre-trip and post-trip inspection
    pub inspection_hours: f64,
    /// Off-duty rest after the post-trip inspection
    pub end_of_day_rest_hours: f64,
    /// Rest from midnight until the driver starts the day
    pub start_of_day_rest_hours: f64,
    pub day_hours: f64,
    pub fuel_interval_miles: f64,
    /// Upper bound on simulated days
    pub max_days: u32,
}

impl Default for HosRules {
    fn default() -> Self {
        Self {
            version: "fmcsa-property-70h-8d".to_string(),
            cycle_limit_hours: 70.0,
            cycle_days: 8,
            daily_driving_hours: 11.0,
            driving_before_break_hours: 8.0,
            break_hours: 0.5,
            pickup_hours: 1.0,
            dropoff_hours: 1.0,
            inspection_hours: 0.5,
            end_of_day_rest_hours: 1.5,
            start_of_day_rest_hours: 6.0,
            day_hours: 24.0,
            fuel_interval_miles: 1000.0,
            max_days: 365,
        }
    }
}

impl HosRules {
    /// Fuel stop spacing in meters
    pub fn fuel_interval_m(&self) -> f64 {
        self.fuel_interval_miles * METERS_PER_MILE
    }

    /// Fixed hours that are part of the trip but not driving
    pub fn trip_allowance_hours(&self) -> f64 {
        self.pickup_hours + self.dropoff_hours
    }

    /// Load defaults, overridden by `HOS_*` environment variables
    ///
    /// # Environment Variables
    ///
    /// - `HOS_RULES_VERSION`
    /// - `HOS_CYCLE_LIMIT_HOURS` (default: 70)
    /// - `HOS_CYCLE_DAYS` (default: 8)
    /// - `HOS_DAILY_DRIVING_HOURS` (default: 11)
    /// - `HOS_DRIVING_BEFORE_BREAK_HOURS` (default: 8)
    /// - `HOS_BREAK_HOURS` (default: 0.5)
    /// - `HOS_FUEL_INTERVAL_MILES` (default: 1000)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let rules = Self {
            version: std::env::var("HOS_RULES_VERSION").unwrap_or(defaults.version),
            cycle_limit_hours: env_f64("HOS_CYCLE_LIMIT_HOURS", defaults.cycle_limit_hours)?,
            cycle_days: env_u32("HOS_CYCLE_DAYS", defaults.cycle_days)?,
            daily_driving_hours: env_f64("HOS_DAILY_DRIVING_HOURS", defaults.daily_driving_hours)?,
            driving_before_break_hours: env_f64(
                "HOS_DRIVING_BEFORE_BREAK_HOURS",
                defaults.driving_before_break_hours,
            )?,
            break_hours: env_f64("HOS_BREAK_HOURS", defaults.break_hours)?,
            fuel_interval_miles: env_f64("HOS_FUEL_INTERVAL_MILES", defaults.fuel_interval_miles)?,
            ..defaults
        };

        rules.validate()?;
        Ok(rules)
    }

    /// Reject rule sets the simulator cannot run
    pub fn validate(&self) -> Result<(), PlanError> {
        let positive = [
            ("cycle_limit_hours", self.cycle_limit_hours),
            ("daily_driving_hours", self.daily_driving_hours),
            ("driving_before_break_hours", self.driving_before_break_hours),
            ("break_hours", self.break_hours),
            ("day_hours", self.day_hours),
            ("fuel_interval_miles", self.fuel_interval_miles),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(PlanError::InvalidRules(format!("{} must be positive, got {}", name, value)));
            }
        }

        if self.cycle_days == 0 || self.max_days == 0 {
            return Err(PlanError::InvalidRules("day counts must be positive".to_string()));
        }

        if self.driving_before_break_hours > self.daily_driving_hours {
            return Err(PlanError::InvalidRules(format!(
                "driving before break ({}h) exceeds daily driving ({}h)",
                self.driving_before_break_hours, self.daily_driving_hours
            )));
        }

        // A restarted cycle must cover at least one full driving day
        if self.cycle_limit_hours < self.daily_driving_hours {
            return Err(PlanError::InvalidRules(format!(
                "cycle limit ({}h) is below daily driving ({}h)",
                self.cycle_limit_hours, self.daily_driving_hours
            )));
        }

        // Longest possible working day must still fit on the clock
        let busiest_day = self.start_of_day_rest_hours
            + 2.0 * self.inspection_hours.max(self.dropoff_hours)
            + self.pickup_hours
            + self.daily_driving_hours
            + 2.0 * self.break_hours
            + self.end_of_day_rest_hours;
        if busiest_day > self.day_hours {
            return Err(PlanError::InvalidRules(format!(
                "busiest day needs {:.1}h but a day has {}h",
                busiest_day, self.day_hours
            )));
        }

        Ok(())
    }
}

fn env_f64(name: &str, default: f64) -> Result<f64> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

fn env_u32(name: &str, default: u32) -> Result<u32> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a whole number, got '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_are_valid() {
        let rules = HosRules::default();
        assert!(rules.validate().is_ok());
        assert_eq!(rules.cycle_limit_hours, 70.0);
        assert_eq!(rules.cycle_days, 8);
        assert_eq!(rules.trip_allowance_hours(), 2.0);
    }

    #[test]
    fn test_fuel_interval_in_meters() {
        let rules = HosRules::default();
        assert!((rules.fuel_interval_m() - 1_609_344.0).abs() < 1e-6);
    }

    #[test]
    fn test_break_limit_above_daily_limit_is_rejected() {
        let rules = HosRules {
            driving_before_break_hours: 12.0,
            ..Default::default()
        };
        assert!(matches!(rules.validate(), Err(PlanError::InvalidRules(_))));
    }

    #[test]
    fn test_cycle_limit_below_daily_driving_is_rejected() {
        let rules = HosRules {
            cycle_limit_hours: 10.0,
            ..Default::default()
        };
        assert!(matches!(rules.validate(), Err(PlanError::InvalidRules(ref m)) if m.contains("cycle limit")));

        let just_enough = HosRules {
            cycle_limit_hours: 11.0,
            ..Default::default()
        };
        assert!(just_enough.validate().is_ok());
    }

    #[test]
    fn test_non_positive_value_is_rejected() {
        let rules = HosRules {
            break_hours: 0.0,
            ..Default::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_day_that_cannot_fit_is_rejected() {
        let rules = HosRules {
            daily_driving_hours: 16.0,
            ..Default::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    #[ignore] // requires --test-threads=1 due to env var race
    fn test_from_env_overrides_cycle_limit() {
        std::env::set_var("HOS_CYCLE_LIMIT_HOURS", "60");
        std::env::set_var("HOS_CYCLE_DAYS", "7");

        let rules = HosRules::from_env().unwrap();
        assert_eq!(rules.cycle_limit_hours, 60.0);
        assert_eq!(rules.cycle_days, 7);

        std::env::remove_var("HOS_CYCLE_LIMIT_HOURS");
        std::env::remove_var("HOS_CYCLE_DAYS");
    }
}
