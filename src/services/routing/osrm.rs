//! OSRM routing engine client
//!
//! OSRM API documentation:
//! https://project-osrm.org/docs/v5.24.0/api/#route-service

use async_trait::async_trait;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::types::{Coordinates, RoutePlan};
use super::RoutingService;

/// OSRM client configuration
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL of OSRM server (e.g., "http://localhost:5000")
    pub base_url: String,
    /// Routing profile
    pub profile: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            timeout_seconds: 20,
        }
    }
}

impl OsrmConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }
}

/// OSRM routing client
pub struct OsrmClient {
    client: Client,
    config: OsrmConfig,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// `lon,lat;lon,lat;...` as OSRM expects
    fn coordinates_path(waypoints: &[Coordinates]) -> String {
        waypoints
            .iter()
            .map(|c| format!("{},{}", c.lng, c.lat))
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Build the route URL with full overview and per-step geometry
    pub fn build_route_url(&self, waypoints: &[Coordinates]) -> String {
        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=polyline&steps=true",
            self.config.base_url,
            self.config.profile,
            Self::coordinates_path(waypoints)
        )
    }

    /// Check the server answers a trivial route request
    pub async fn check_health(&self) -> Result<()> {
        let probe = [Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 0.0)];
        let url = format!(
            "{}/route/v1/{}/{}?overview=false",
            self.config.base_url,
            self.config.profile,
            Self::coordinates_path(&probe)
        );

        let response = self.client.get(&url).send().await?;

        // A point in the ocean may not snap, but any OSRM JSON reply means the server is up
        if response.status().is_success() || response.status().is_client_error() {
            Ok(())
        } else {
            anyhow::bail!("OSRM returned status {}", response.status())
        }
    }
}

#[async_trait]
impl RoutingService for OsrmClient {
    async fn route(&self, waypoints: &[Coordinates]) -> Result<RoutePlan> {
        if waypoints.len() < 2 {
            anyhow::bail!("At least two waypoints are required, got {}", waypoints.len());
        }

        let url = self.build_route_url(waypoints);
        debug!("Requesting route from OSRM for {} waypoints", waypoints.len());

        let response = self.client
            .get(&url)
            .send()
            .await
            .context("Failed to send route request to OSRM")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OSRM route returned error {}: {}", status, body);
        }

        let route_response: RouteResponse = response
            .json()
            .await
            .context("Failed to parse OSRM route response")?;

        let route = route_response.into_first_route()?;

        debug!(
            "Received route: {:.1} km, {:.1} h, {} legs",
            route.distance / 1000.0,
            route.duration / 3600.0,
            route.legs.len()
        );

        Ok(route)
    }

    fn name(&self) -> &str {
        "OSRM"
    }
}

// OSRM API types

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<RoutePlan>,
}

impl RouteResponse {
    fn into_first_route(self) -> Result<RoutePlan> {
        if self.code != "Ok" {
            anyhow::bail!(
                "OSRM returned code {}: {}",
                self.code,
                self.message.unwrap_or_default()
            );
        }

        self.routes
            .into_iter()
            .next()
            .context("OSRM returned no routes")
    }
}
