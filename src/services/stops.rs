//! Waypoint planning: current location, pickup, fuel stops, dropoff

use tracing::debug;

use crate::services::geo::locate_on_route;
use crate::types::{Coordinates, RoutePlan, Stop, StopKind};

/// Build the ordered stop list for a route
///
/// Fuel stops are placed every `fuel_interval_m` meters, never closer than
/// one meter to the end of the route. A fuel stop whose position cannot be
/// read from the step geometry is emitted with its fractional progress along
/// the route instead of coordinates.
pub fn plan_stops(
    route: &RoutePlan,
    current: Coordinates,
    pickup: Coordinates,
    dropoff: Coordinates,
    fuel_interval_m: f64,
) -> Vec<Stop> {
    let route_distance_m = route.distance;

    let mut stops = vec![
        Stop::at(StopKind::Current, current, "Current location"),
        Stop::at(StopKind::Pickup, pickup, "Pickup (1h)"),
    ];

    if route_distance_m > fuel_interval_m && fuel_interval_m > 0.0 {
        let fuel_stops = (route_distance_m / fuel_interval_m).floor() as usize;

        for i in 1..=fuel_stops {
            let target_m = (i as f64 * fuel_interval_m).min(route_distance_m - 1.0);
            let label = format!("Fuel stop #{}", i);

            let stop = match locate_on_route(&route.legs, target_m) {
                Ok(coords) => Stop::at(StopKind::Fuel, coords, label),
                Err(e) => {
                    debug!("Fuel stop #{} at {:.0} m falls back to progress: {}", i, target_m, e);
                    Stop::at_progress(StopKind::Fuel, target_m / route_distance_m, label)
                }
            };
            stops.push(stop);
        }
    }

    stops.push(Stop::at(StopKind::Dropoff, dropoff, "Dropoff (1h)"));
    stops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::geo::{decode_polyline, encode_polyline, path_length, POLYLINE_PRECISION};
    use crate::types::{RouteLeg, RouteStep};

    const INTERVAL_M: f64 = 1_609_344.0;

    fn current() -> Coordinates {
        Coordinates::new(41.8781, -87.6298)
    }

    fn pickup() -> Coordinates {
        Coordinates::new(39.7684, -86.1581)
    }

    fn dropoff() -> Coordinates {
        Coordinates::new(32.7767, -96.7970)
    }

    /// Straight east-west route along the equator split into equal steps
    fn equator_route(total_degrees: f64, steps: usize) -> RoutePlan {
        let step_degrees = total_degrees / steps as f64;
        let route_steps: Vec<RouteStep> = (0..steps)
            .map(|i| {
                let from = Coordinates::new(0.0, i as f64 * step_degrees);
                let to = Coordinates::new(0.0, (i + 1) as f64 * step_degrees);
                let geometry = encode_polyline(&[from, to], POLYLINE_PRECISION);
                let decoded = decode_polyline(&geometry, POLYLINE_PRECISION).unwrap();
                RouteStep {
                    distance: path_length(&decoded),
                    geometry: Some(geometry),
                }
            })
            .collect();
        let distance = route_steps.iter().map(|s| s.distance).sum();

        RoutePlan {
            distance,
            duration: 0.0,
            geometry: None,
            legs: vec![RouteLeg { distance, duration: 0.0, steps: route_steps }],
        }
    }

    fn kinds(stops: &[Stop]) -> Vec<StopKind> {
        stops.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn test_short_route_has_no_fuel_stops() {
        let route = RoutePlan { distance: INTERVAL_M, ..Default::default() };

        let stops = plan_stops(&route, current(), pickup(), dropoff(), INTERVAL_M);

        assert_eq!(stops.len(), 3);
        assert_eq!(kinds(&stops), vec![StopKind::Current, StopKind::Pickup, StopKind::Dropoff]);
        assert_eq!(stops[0].label, "Current location");
        assert_eq!(stops[1].label, "Pickup (1h)");
        assert_eq!(stops[2].label, "Dropoff (1h)");
        assert_eq!(stops[2].coords, Some(dropoff()));
    }

    #[test]
    fn test_two_and_a_half_intervals_gives_two_fuel_stops() {
        // 1 degree of longitude at the equator is ~111.2 km, so ~36.2 degrees
        // is ~2.5 intervals
        let route = equator_route(36.2, 8);
        let ratio = route.distance / INTERVAL_M;
        assert!(ratio > 2.4 && ratio < 2.6, "ratio {}", ratio);

        let stops = plan_stops(&route, current(), pickup(), dropoff(), INTERVAL_M);

        assert_eq!(
            kinds(&stops),
            vec![StopKind::Current, StopKind::Pickup, StopKind::Fuel, StopKind::Fuel, StopKind::Dropoff]
        );
        assert_eq!(stops[2].label, "Fuel stop #1");
        assert_eq!(stops[3].label, "Fuel stop #2");

        let start = Coordinates::new(0.0, 0.0);
        for (stop, multiple) in stops[2..4].iter().zip([1.0, 2.0]) {
            let coords = stop.coords.expect("fuel stop should resolve");
            let from_start = crate::services::geo::haversine_distance(&start, &coords);
            assert!(
                (from_start - multiple * INTERVAL_M).abs() < 1_000.0,
                "stop at {} m, expected ~{} m",
                from_start,
                multiple * INTERVAL_M
            );
        }
    }

    #[test]
    fn test_exact_multiple_caps_last_stop_before_dropoff() {
        // No legs, so both stops fall back to progress values
        let route = RoutePlan { distance: 2.0 * INTERVAL_M, ..Default::default() };

        let stops = plan_stops(&route, current(), pickup(), dropoff(), INTERVAL_M);

        assert_eq!(stops.len(), 5);
        let last_fuel = &stops[3];
        assert!(!last_fuel.is_resolved());
        let progress = last_fuel.progress.unwrap();
        assert!(progress < 1.0);
        assert!((progress - (2.0 * INTERVAL_M - 1.0) / (2.0 * INTERVAL_M)).abs() < 1e-12);
    }

    #[test]
    fn test_unresolvable_geometry_falls_back_to_progress() {
        let distance = 2.5 * INTERVAL_M;
        let route = RoutePlan {
            distance,
            duration: 0.0,
            geometry: None,
            legs: vec![RouteLeg {
                distance,
                duration: 0.0,
                steps: vec![RouteStep { distance, geometry: Some("not a polyline!".to_string()) }],
            }],
        };

        let stops = plan_stops(&route, current(), pickup(), dropoff(), INTERVAL_M);

        assert_eq!(stops.len(), 5);
        assert_eq!(stops[2].progress, Some(0.4));
        assert_eq!(stops[3].progress, Some(0.8));
        assert!(stops[2].coords.is_none());
        assert_eq!(stops.last().unwrap().kind, StopKind::Dropoff);
    }
}
