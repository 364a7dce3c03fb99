use thiserror::Error;

/// Inputs the simulator refuses to run with
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("route has no driving duration, average speed is undefined")]
    ZeroDrivingDuration,
    #[error("current cycle hours must be a non-negative number, got {0}")]
    NegativeCycleHours(f64),
    #[error("invalid route: {0}")]
    InvalidRoute(String),
    #[error("invalid HOS rules: {0}")]
    InvalidRules(String),
}
