//! Configuration management

use anyhow::Result;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// NATS server URL
    pub nats_url: String,

    /// Nominatim API URL (for geocoding)
    pub nominatim_url: String,

    /// OSRM routing engine URL (optional, falls back to mock if unavailable)
    pub osrm_url: Option<String>,

    /// Geocoder backend: "mock" or "nominatim"
    pub geocoder_backend: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let nats_url = std::env::var("NATS_URL")
            .unwrap_or_else(|_| "nats://localhost:4222".to_string());

        let nominatim_url = std::env::var("NOMINATIM_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string());

        let osrm_url = std::env::var("OSRM_URL").ok().filter(|url| !url.trim().is_empty());

        let geocoder_backend = std::env::var("GEOCODER_BACKEND")
            .unwrap_or_else(|_| "mock".to_string())
            .trim()
            .to_lowercase();

        if !nats_url.starts_with("nats://") && !nats_url.starts_with("tls://") {
            anyhow::bail!("NATS_URL must start with nats:// or tls:// (got {})", nats_url);
        }

        Ok(Self {
            nats_url,
            nominatim_url,
            osrm_url,
            geocoder_backend,
        })
    }
}
