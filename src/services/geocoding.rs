//! Geocoding abstraction layer with safety features
//!
//! - MockGeocoder for tests and development (deterministic, no network)
//! - RateLimitedNominatimGeocoder for production (strict rate limiting)
//!
//! Selected by GEOCODER_BACKEND:
//! - "mock" → MockGeocoder
//! - "nominatim" → RateLimitedNominatimGeocoder

use std::sync::{Mutex as SyncMutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::services::nominatim::NominatimClient;
use crate::types::Coordinates;

/// Geocoder trait - abstraction for all geocoding implementations
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Geocode a free-form address to coordinates
    /// Returns None if the address cannot be found
    async fn geocode(&self, query: &str) -> Result<Option<GeocodingResult>>;

    /// Get the name of this geocoder implementation
    fn name(&self) -> &'static str;
}

/// Result of geocoding operation
#[derive(Debug, Clone)]
pub struct GeocodingResult {
    /// Latitude and longitude
    pub coordinates: Coordinates,
    /// Confidence score 0.0-1.0
    pub confidence: f64,
    /// Display name returned by geocoder
    pub display_name: String,
}

/// Mock geocoder for testing - returns deterministic fake coordinates
pub struct MockGeocoder;

impl MockGeocoder {
    pub fn new() -> Self {
        Self
    }

    /// Generate deterministic coordinates from the query hash
    /// Coordinates fall inside the contiguous United States, away from coasts
    fn hash_to_coordinates(query: &str) -> Coordinates {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        query.trim().to_lowercase().hash(&mut hasher);
        let hash = hasher.finish();

        const LAT_MIN: f64 = 31.0;
        const LAT_MAX: f64 = 46.0;
        const LNG_MIN: f64 = -118.0;
        const LNG_MAX: f64 = -78.0;

        let lat_normalized = ((hash >> 32) as f64) / (u32::MAX as f64);
        let lng_normalized = ((hash & 0xFFFFFFFF) as f64) / (u32::MAX as f64);

        Coordinates {
            lat: LAT_MIN + lat_normalized * (LAT_MAX - LAT_MIN),
            lng: LNG_MIN + lng_normalized * (LNG_MAX - LNG_MIN),
        }
    }
}

impl Default for MockGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodingResult>> {
        if query.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(GeocodingResult {
            coordinates: Self::hash_to_coordinates(query),
            confidence: 0.95,
            display_name: format!("{}, United States", query.trim()),
        }))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Spaces calls at least `min_interval` apart
///
/// Each caller reserves the next free slot under the lock and then sleeps
/// until it, so concurrent callers queue in arrival order.
pub struct RateLimiter {
    min_interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Wait for this caller's slot
    pub async fn wait(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = next.map_or(now, |n| n.max(now));
            *next = Some(slot + self.min_interval);
            slot
        };

        tokio::time::sleep_until(tokio::time::Instant::from_std(slot)).await;
    }
}

#[derive(Debug, Default)]
struct BreakerState {
    failures: u32,
    last_failure: Option<Instant>,
}

/// Stops calls to an upstream after `threshold` consecutive failures
///
/// The breaker lets a call through again once `recovery_time` has passed
/// since the last failure.
pub struct CircuitBreaker {
    threshold: u32,
    recovery_time: Duration,
    state: SyncMutex<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(threshold: u32, recovery_time: Duration) -> Self {
        Self {
            threshold,
            recovery_time,
            state: SyncMutex::new(BreakerState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, BreakerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_open(&self) -> bool {
        let state = self.state();
        state.failures >= self.threshold
            && state.last_failure.is_some_and(|t| t.elapsed() < self.recovery_time)
    }

    pub fn record_failure(&self) {
        let mut state = self.state();
        state.failures += 1;
        state.last_failure = Some(Instant::now());
    }

    pub fn record_success(&self) {
        *self.state() = BreakerState::default();
    }
}

/// Default rate limit interval (1.5 seconds - Nominatim allows 1 req/s)
const DEFAULT_RATE_LIMIT_MS: u64 = 1500;

/// Default circuit breaker threshold (3 failures)
const DEFAULT_CIRCUIT_BREAKER_THRESHOLD: u32 = 3;

/// Default circuit breaker recovery time (5 minutes)
const DEFAULT_CIRCUIT_BREAKER_RECOVERY_SECS: u64 = 300;

/// Rate-limited Nominatim geocoder with circuit breaker protection
pub struct RateLimitedNominatimGeocoder {
    client: NominatimClient,
    rate_limiter: RateLimiter,
    pub(crate) circuit_breaker: CircuitBreaker,
}

impl RateLimitedNominatimGeocoder {
    /// Create with default rate limit and circuit breaker settings
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(
            base_url,
            Duration::from_millis(DEFAULT_RATE_LIMIT_MS),
            DEFAULT_CIRCUIT_BREAKER_THRESHOLD,
            Duration::from_secs(DEFAULT_CIRCUIT_BREAKER_RECOVERY_SECS),
        )
    }

    /// Create with custom configuration
    pub fn with_config(
        base_url: &str,
        rate_limit_interval: Duration,
        circuit_breaker_threshold: u32,
        circuit_breaker_recovery: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: NominatimClient::new(base_url)?,
            rate_limiter: RateLimiter::new(rate_limit_interval),
            circuit_breaker: CircuitBreaker::new(circuit_breaker_threshold, circuit_breaker_recovery),
        })
    }
}

#[async_trait]
impl Geocoder for RateLimitedNominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodingResult>> {
        if self.circuit_breaker.is_open() {
            tracing::warn!("Circuit breaker is open, rejecting geocoding request");
            anyhow::bail!("Geocoding service temporarily unavailable (circuit breaker open)");
        }

        self.rate_limiter.wait().await;

        match self.client.geocode(query).await {
            Ok(Some(place)) => {
                self.circuit_breaker.record_success();
                Ok(Some(GeocodingResult {
                    coordinates: place.coordinates,
                    confidence: 0.8, // Nominatim doesn't provide confidence
                    display_name: place.display_name,
                }))
            }
            Ok(None) => {
                // No result found is not a failure
                self.circuit_breaker.record_success();
                Ok(None)
            }
            Err(e) => {
                self.circuit_breaker.record_failure();
                tracing::error!("Geocoding '{}' failed: {}", query, e);
                Err(e)
            }
        }
    }

    fn name(&self) -> &'static str {
        "nominatim"
    }
}

/// Create geocoder for the configured backend ("mock" or "nominatim")
///
/// Unknown backends fall back to mock with a warning.
pub fn create_geocoder(backend: &str, nominatim_url: &str) -> Result<Box<dyn Geocoder>> {
    match backend {
        "mock" => {
            tracing::info!("Using MockGeocoder");
            Ok(Box::new(MockGeocoder::new()))
        }
        "nominatim" => {
            tracing::info!("Using RateLimitedNominatimGeocoder at {}", nominatim_url);
            Ok(Box::new(RateLimitedNominatimGeocoder::new(nominatim_url)?))
        }
        _ => {
            tracing::warn!("Unknown GEOCODER_BACKEND '{}', using mock", backend);
            Ok(Box::new(MockGeocoder::new()))
        }
    }
}
