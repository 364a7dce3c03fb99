//! Nominatim geocoding client

use anyhow::{Context, Result};
use serde::Deserialize;
use crate::types::Coordinates;

/// Nominatim API response
#[derive(Debug, Deserialize)]
pub struct NominatimResult {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
}

/// A single resolved address
#[derive(Debug, Clone, PartialEq)]
pub struct NominatimPlace {
    pub coordinates: Coordinates,
    pub display_name: String,
}

impl NominatimResult {
    fn into_place(self) -> Result<NominatimPlace> {
        let lat: f64 = self.lat.parse().context("Invalid latitude")?;
        let lng: f64 = self.lon.parse().context("Invalid longitude")?;

        Ok(NominatimPlace {
            coordinates: Coordinates { lat, lng },
            display_name: self.display_name,
        })
    }
}

/// Nominatim geocoding client
pub struct NominatimClient {
    base_url: String,
    client: reqwest::Client,
}

impl NominatimClient {
    /// Create a new client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("eld-planner-worker/0.1")
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Build the free-form search URL for `query`
    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    /// Geocode a free-form address
    pub async fn geocode(&self, query: &str) -> Result<Option<NominatimPlace>> {
        let url = self.search_url(query);

        let response = self.client
            .get(&url)
            .send()
            .await
            .context("Failed to send geocoding request")?;

        if !response.status().is_success() {
            anyhow::bail!("Nominatim returned status {}", response.status());
        }

        let results: Vec<NominatimResult> = response
            .json()
            .await
            .context("Failed to parse geocoding response")?;

        results.into_iter().next().map(NominatimResult::into_place).transpose()
    }
}
