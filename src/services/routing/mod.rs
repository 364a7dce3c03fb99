//! Routing service for turn-by-turn routes with step geometry
//!
//! Uses OSRM for production, mock for tests.

mod osrm;

pub use osrm::{OsrmClient, OsrmConfig};

use async_trait::async_trait;
use anyhow::Result;

use crate::services::geo::{decode_polyline, encode_polyline, path_length, POLYLINE_PRECISION};
use crate::types::{Coordinates, RouteLeg, RoutePlan, RouteStep};

/// Routing service trait for abstraction (OSRM, mock, etc.)
#[async_trait]
pub trait RoutingService: Send + Sync {
    /// Route through `waypoints` in order, one leg per consecutive pair
    async fn route(&self, waypoints: &[Coordinates]) -> Result<RoutePlan>;

    /// Get service name for logging
    fn name(&self) -> &str;
}

/// Mock routing service for tests
/// Straight lines between waypoints at a fixed average speed
pub struct MockRoutingService {
    /// Average speed in km/h for time estimation (default: 80)
    average_speed_kmh: f64,
}

impl Default for MockRoutingService {
    fn default() -> Self {
        Self {
            average_speed_kmh: 80.0,
        }
    }
}

impl MockRoutingService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_speed(average_speed_kmh: f64) -> Self {
        Self { average_speed_kmh }
    }

    fn straight_leg(&self, from: Coordinates, to: Coordinates) -> RouteLeg {
        let geometry = encode_polyline(&[from, to], POLYLINE_PRECISION);
        // Measure the encoded path so step distance and geometry agree
        let distance = decode_polyline(&geometry, POLYLINE_PRECISION)
            .map(|points| path_length(&points))
            .unwrap_or(0.0);
        let duration = distance / 1000.0 / self.average_speed_kmh * 3600.0;

        RouteLeg {
            distance,
            duration,
            steps: vec![RouteStep {
                distance,
                geometry: Some(geometry),
            }],
        }
    }
}

#[async_trait]
impl RoutingService for MockRoutingService {
    async fn route(&self, waypoints: &[Coordinates]) -> Result<RoutePlan> {
        if waypoints.len() < 2 {
            anyhow::bail!("At least two waypoints are required, got {}", waypoints.len());
        }

        let legs: Vec<RouteLeg> = waypoints
            .windows(2)
            .map(|pair| self.straight_leg(pair[0], pair[1]))
            .collect();

        Ok(RoutePlan {
            distance: legs.iter().map(|l| l.distance).sum(),
            duration: legs.iter().map(|l| l.duration).sum(),
            geometry: Some(encode_polyline(waypoints, POLYLINE_PRECISION)),
            legs,
        })
    }

    fn name(&self) -> &str {
        "MockRouting"
    }
}

/// Create routing service with automatic OSRM detection and fallback
///
/// Tries to connect to OSRM if URL is provided. Falls back to mock
/// routing service if OSRM is unavailable or URL is not configured.
pub async fn create_routing_service_with_fallback(
    osrm_url: Option<String>,
) -> Box<dyn RoutingService> {
    use tracing::{info, warn};

    if let Some(url) = osrm_url {
        match OsrmClient::new(OsrmConfig::new(&url)) {
            Ok(client) => match client.check_health().await {
                Ok(()) => {
                    info!("OSRM routing service available at {}", url);
                    return Box::new(client);
                }
                Err(e) => {
                    warn!("OSRM not available at {}: {}. Falling back to mock routing.", url, e);
                }
            },
            Err(e) => {
                warn!("Failed to create OSRM client: {}. Falling back to mock routing.", e);
            }
        }
    }

    info!("Using mock routing service (OSRM not configured or unavailable)");
    Box::new(MockRoutingService::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::geo::{haversine_distance, point_at_route_distance};

    fn chicago() -> Coordinates {
        Coordinates { lat: 41.8781, lng: -87.6298 }
    }

    fn indianapolis() -> Coordinates {
        Coordinates { lat: 39.7684, lng: -86.1581 }
    }

    fn dallas() -> Coordinates {
        Coordinates { lat: 32.7767, lng: -96.7970 }
    }

    #[tokio::test]
    async fn test_mock_routing_requires_two_waypoints() {
        let service = MockRoutingService::new();
        assert!(service.route(&[chicago()]).await.is_err());
        assert!(service.route(&[]).await.is_err());
    }

    #[tokio::test]
    async fn test_mock_routing_one_leg_per_pair() {
        let service = MockRoutingService::new();
        let route = service.route(&[chicago(), indianapolis(), dallas()]).await.unwrap();

        assert_eq!(route.legs.len(), 2);
        let leg_sum: f64 = route.legs.iter().map(|l| l.distance).sum();
        assert!((route.distance - leg_sum).abs() < 1e-6);
        for leg in &route.legs {
            let step_sum: f64 = leg.steps.iter().map(|s| s.distance).sum();
            assert!((leg.distance - step_sum).abs() < 1e-6);
        }

        // Chicago to Indianapolis is ~265 km straight line
        let first_km = route.legs[0].distance / 1000.0;
        assert!(first_km > 250.0 && first_km < 280.0, "got {} km", first_km);
    }

    #[tokio::test]
    async fn test_mock_routing_travel_time() {
        let service = MockRoutingService::with_speed(100.0);
        let route = service.route(&[chicago(), indianapolis()]).await.unwrap();

        let hours = route.duration / 3600.0;
        let expected = route.distance / 1000.0 / 100.0;
        assert!((hours - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_mock_route_geometry_is_walkable() {
        let service = MockRoutingService::new();
        let route = service.route(&[chicago(), indianapolis(), dallas()]).await.unwrap();

        let end = point_at_route_distance(&route.legs, route.distance - 1.0).unwrap();
        assert!(haversine_distance(&end, &dallas()) < 5.0);
    }

    #[test]
    fn test_routing_service_name() {
        let mock = MockRoutingService::new();
        assert_eq!(mock.name(), "MockRouting");
    }

    #[tokio::test]
    async fn test_create_routing_service_with_fallback_no_url() {
        let service = create_routing_service_with_fallback(None).await;
        assert_eq!(service.name(), "MockRouting");
    }

    #[tokio::test]
    async fn test_create_routing_service_with_fallback_invalid_url() {
        // Should fall back to mock when URL is invalid/unreachable
        let service = create_routing_service_with_fallback(
            Some("http://localhost:99999".to_string())
        ).await;
        assert_eq!(service.name(), "MockRouting");
    }

    #[tokio::test]
    #[ignore = "Requires running OSRM server"]
    async fn test_create_routing_service_with_fallback_osrm_available() {
        let service = create_routing_service_with_fallback(
            Some("http://localhost:5000".to_string())
        ).await;
        assert_eq!(service.name(), "OSRM");
    }
}
