//! Trip planning: geocode, route, simulate duty status, place stops

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::services::geocoding::{create_geocoder, Geocoder};
use crate::services::hos::{HosRules, HosSimulator, PlanError};
use crate::services::routing::{create_routing_service_with_fallback, RoutingService};
use crate::services::stops::plan_stops;
use crate::types::{Coordinates, RouteSummary, TripPlan, TripRequest};

/// Why a trip could not be planned
#[derive(Debug, Error)]
pub enum TripError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Address not found: {0}")]
    AddressNotFound(String),

    #[error("Cannot plan trip: {0}")]
    Plan(#[from] PlanError),

    #[error("Geocoding failed: {0}")]
    Geocoding(#[source] anyhow::Error),

    #[error("Routing failed: {0}")]
    Routing(#[source] anyhow::Error),
}

impl TripError {
    /// Error code sent back over NATS
    pub fn code(&self) -> &'static str {
        match self {
            TripError::InvalidInput(_) | TripError::Plan(_) => "INVALID_INPUT",
            TripError::AddressNotFound(_) => "ADDRESS_NOT_FOUND",
            TripError::Geocoding(_) | TripError::Routing(_) => "UPSTREAM_ERROR",
        }
    }

    /// Caller mistake rather than a collaborator failure
    pub fn is_input_error(&self) -> bool {
        !matches!(self, TripError::Geocoding(_) | TripError::Routing(_))
    }
}

/// Plans trips against shared geocoding and routing services
#[derive(Clone)]
pub struct TripPlanner {
    geocoder: Arc<dyn Geocoder>,
    routing: Arc<dyn RoutingService>,
    rules: HosRules,
}

impl TripPlanner {
    pub fn new(geocoder: Arc<dyn Geocoder>, routing: Arc<dyn RoutingService>, rules: HosRules) -> Self {
        Self { geocoder, routing, rules }
    }

    /// Wire the configured geocoder and routing backends
    pub async fn from_config(config: &Config, rules: HosRules) -> anyhow::Result<Self> {
        let geocoder: Arc<dyn Geocoder> =
            Arc::from(create_geocoder(&config.geocoder_backend, &config.nominatim_url)?);
        info!("Geocoder initialized: {}", geocoder.name());

        let routing: Arc<dyn RoutingService> =
            Arc::from(create_routing_service_with_fallback(config.osrm_url.clone()).await);
        info!("Routing service initialized: {}", routing.name());

        Ok(Self::new(geocoder, routing, rules))
    }

    pub fn rules(&self) -> &HosRules {
        &self.rules
    }

    pub async fn plan(&self, request: &TripRequest) -> Result<TripPlan, TripError> {
        validate(request)?;

        info!(
            "Planning trip {} -> {} -> {} ({:.1}h cycle used)",
            request.current_location,
            request.pickup_location,
            request.dropoff_location,
            request.current_cycle_hours
        );

        let current = self.locate(&request.current_location).await?;
        let pickup = self.locate(&request.pickup_location).await?;
        let dropoff = self.locate(&request.dropoff_location).await?;

        let route = self.routing
            .route(&[current, pickup, dropoff])
            .await
            .map_err(TripError::Routing)?;
        let pickup_route = self.routing
            .route(&[current, pickup])
            .await
            .map_err(TripError::Routing)?;

        let simulator = HosSimulator::new(
            &route,
            &pickup_route,
            request.current_cycle_hours,
            self.rules.clone(),
        )?;
        let logs = simulator.simulate();
        let stops = plan_stops(&route, current, pickup, dropoff, self.rules.fuel_interval_m());

        info!(
            "Trip planned via {}: {:.1} mi, {} days, {} stops",
            self.routing.name(),
            simulator.profile().distance_miles,
            logs.len(),
            stops.len()
        );

        Ok(TripPlan {
            route: RouteSummary::from(&route),
            stops,
            logs,
        })
    }

    async fn locate(&self, address: &str) -> Result<Coordinates, TripError> {
        let result = self.geocoder
            .geocode(address)
            .await
            .map_err(TripError::Geocoding)?
            .ok_or_else(|| TripError::AddressNotFound(address.to_string()))?;

        debug!(
            "Geocoded '{}' to ({:.5}, {:.5}) via {}",
            address,
            result.coordinates.lat,
            result.coordinates.lng,
            self.geocoder.name()
        );
        Ok(result.coordinates)
    }
}

fn validate(request: &TripRequest) -> Result<(), TripError> {
    for (field, value) in [
        ("current_location", &request.current_location),
        ("pickup_location", &request.pickup_location),
        ("dropoff_location", &request.dropoff_location),
    ] {
        if value.trim().is_empty() {
            return Err(TripError::InvalidInput(format!("{} is required", field)));
        }
    }

    let cycle = request.current_cycle_hours;
    if !cycle.is_finite() || cycle < 0.0 {
        return Err(TripError::InvalidInput(format!(
            "current_cycle_hours must be a non-negative number, got {}",
            cycle
        )));
    }

    Ok(())
}
