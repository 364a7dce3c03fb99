//! Geographic calculations
//!
//! Great-circle distances, polyline encoding/decoding, and locating the point
//! that lies a given distance along a route's step geometry.

use thiserror::Error;
use tracing::trace;

use crate::types::{Coordinates, RouteLeg};

/// Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Coordinate precision of OSRM polylines (Google encoding)
pub const POLYLINE_PRECISION: u32 = 5;

/// Why a point could not be located on a step's geometry
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("step has no geometry")]
    NoGeometry,
    #[error("malformed polyline at byte {0}")]
    Malformed(usize),
    #[error("geometry has {0} point(s), need at least 2")]
    TooFewPoints(usize),
    #[error("target {target:.1} m is beyond path length {length:.1} m")]
    BeyondEnd { target: f64, length: f64 },
}

/// Calculate Haversine distance between two points in meters
pub fn haversine_distance(from: &Coordinates, to: &Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lng - from.lng).to_radians();

    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Total length of a path in meters
pub fn path_length(points: &[Coordinates]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_distance(&pair[0], &pair[1]))
        .sum()
}

/// Decode one zig-zag varint value starting at `*i`
fn decode_value(bytes: &[u8], i: &mut usize) -> Result<i64, GeometryError> {
    let mut shift = 0;
    let mut result = 0i64;
    loop {
        let pos = *i;
        let byte = *bytes.get(pos).ok_or(GeometryError::Malformed(pos))?;
        if !(63..=126).contains(&byte) || shift > 60 {
            return Err(GeometryError::Malformed(pos));
        }
        let chunk = byte as i64 - 63;
        *i += 1;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }
    Ok(if result & 1 != 0 { !(result >> 1) } else { result >> 1 })
}

/// Decode an encoded polyline into points
pub fn decode_polyline(encoded: &str, precision: u32) -> Result<Vec<Coordinates>, GeometryError> {
    let factor = 10_f64.powi(precision as i32);
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut lat = 0i64;
    let mut lng = 0i64;
    let mut i = 0;

    while i < bytes.len() {
        lat += decode_value(bytes, &mut i)?;
        lng += decode_value(bytes, &mut i)?;
        points.push(Coordinates::new(lat as f64 / factor, lng as f64 / factor));
    }

    Ok(points)
}

fn encode_value(value: i64, out: &mut String) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };
    while v >= 0x20 {
        out.push((((v & 0x1f) | 0x20) as u8 + 63) as char);
        v >>= 5;
    }
    out.push((v as u8 + 63) as char);
}

/// Encode points as a polyline
pub fn encode_polyline(points: &[Coordinates], precision: u32) -> String {
    let factor = 10_f64.powi(precision as i32);
    let mut out = String::new();
    let mut prev_lat = 0i64;
    let mut prev_lng = 0i64;

    for point in points {
        let lat = (point.lat * factor).round() as i64;
        let lng = (point.lng * factor).round() as i64;
        encode_value(lat - prev_lat, &mut out);
        encode_value(lng - prev_lng, &mut out);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

/// Walk a decoded path and interpolate the point `target_m` meters from its start
fn locate_on_path(points: &[Coordinates], target_m: f64) -> Result<Coordinates, GeometryError> {
    if points.len() < 2 {
        return Err(GeometryError::TooFewPoints(points.len()));
    }

    let mut travelled_m = 0.0;
    for pair in points.windows(2) {
        let segment_m = haversine_distance(&pair[0], &pair[1]);

        if travelled_m + segment_m >= target_m {
            let fraction = if segment_m > 0.0 {
                (target_m - travelled_m) / segment_m
            } else {
                0.0
            };
            return Ok(pair[0].lerp(&pair[1], fraction));
        }

        travelled_m += segment_m;
    }

    Err(GeometryError::BeyondEnd { target: target_m, length: travelled_m })
}

/// Locate the point `target_m` meters along one step's encoded geometry
pub fn locate_on_step(geometry: Option<&str>, target_m: f64) -> Result<Coordinates, GeometryError> {
    let encoded = geometry
        .filter(|g| !g.is_empty())
        .ok_or(GeometryError::NoGeometry)?;
    let points = decode_polyline(encoded, POLYLINE_PRECISION)?;
    locate_on_path(&points, target_m)
}

/// Point at `target_m` meters along an encoded geometry, `None` if it cannot be resolved
pub fn point_at_distance(geometry: &str, target_m: f64) -> Option<Coordinates> {
    locate_on_step(Some(geometry), target_m).ok()
}

/// Locate the point `target_m` meters from the start of a multi-leg route
///
/// Walks legs, then the steps of the leg containing the target, then the
/// geometry of the containing step.
pub fn locate_on_route(legs: &[RouteLeg], target_m: f64) -> Result<Coordinates, GeometryError> {
    let mut travelled_m = 0.0;

    for leg in legs {
        let leg_m = usable_meters(leg.distance);

        if travelled_m + leg_m >= target_m {
            let into_leg_m = target_m - travelled_m;

            let mut travelled_on_steps_m = 0.0;
            for step in &leg.steps {
                let step_m = usable_meters(step.distance);

                if travelled_on_steps_m + step_m >= into_leg_m {
                    let into_step_m = into_leg_m - travelled_on_steps_m;
                    trace!("target {:.1} m falls {:.1} m into a step", target_m, into_step_m);
                    return locate_on_step(step.geometry.as_deref(), into_step_m);
                }

                travelled_on_steps_m += step_m;
            }
        }

        travelled_m += leg_m;
    }

    Err(GeometryError::BeyondEnd { target: target_m, length: travelled_m })
}

/// Negative and non-finite distances count as zero
fn usable_meters(distance: f64) -> f64 {
    if distance.is_finite() {
        distance.max(0.0)
    } else {
        0.0
    }
}

/// Point at `target_m` meters along the route, `None` if it cannot be resolved
pub fn point_at_route_distance(legs: &[RouteLeg], target_m: f64) -> Option<Coordinates> {
    locate_on_route(legs, target_m).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RouteStep;

    fn chicago() -> Coordinates {
        Coordinates { lat: 41.8781, lng: -87.6298 }
    }

    fn st_louis() -> Coordinates {
        Coordinates { lat: 38.6270, lng: -90.1994 }
    }

    fn step_between(points: &[Coordinates]) -> RouteStep {
        let decoded = decode_polyline(&encode_polyline(points, POLYLINE_PRECISION), POLYLINE_PRECISION).unwrap();
        RouteStep {
            distance: path_length(&decoded),
            geometry: Some(encode_polyline(points, POLYLINE_PRECISION)),
        }
    }

    fn leg_of(steps: Vec<RouteStep>) -> RouteLeg {
        RouteLeg {
            distance: steps.iter().map(|s| s.distance).sum(),
            duration: 0.0,
            steps,
        }
    }

    #[test]
    fn test_haversine_chicago_st_louis() {
        let distance = haversine_distance(&chicago(), &st_louis());

        // Chicago to St. Louis is approximately 420 km
        assert!((distance - 420_000.0).abs() < 10_000.0, "got {} m", distance);
    }

    #[test]
    fn test_haversine_same_point() {
        let point = chicago();
        assert!(haversine_distance(&point, &point).abs() < 0.001);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = haversine_distance(&chicago(), &st_louis());
        let b = haversine_distance(&st_louis(), &chicago());
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn test_decode_known_polyline() {
        let points = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@", 5).unwrap();

        assert_eq!(points.len(), 3);
        assert!((points[0].lat - 38.5).abs() < 1e-9);
        assert!((points[0].lng + 120.2).abs() < 1e-9);
        assert!((points[1].lat - 40.7).abs() < 1e-9);
        assert!((points[1].lng + 120.95).abs() < 1e-9);
        assert!((points[2].lat - 43.252).abs() < 1e-9);
        assert!((points[2].lng + 126.453).abs() < 1e-9);
    }

    #[test]
    fn test_encode_matches_known_polyline() {
        let points = vec![
            Coordinates::new(38.5, -120.2),
            Coordinates::new(40.7, -120.95),
            Coordinates::new(43.252, -126.453),
        ];
        assert_eq!(encode_polyline(&points, 5), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
    }

    #[test]
    fn test_decode_empty_is_empty_path() {
        assert!(decode_polyline("", 5).unwrap().is_empty());
    }

    #[test]
    fn test_decode_truncated_is_malformed() {
        // Latitude present, longitude cut off
        let result = decode_polyline("_p~iF", 5);
        assert_eq!(result, Err(GeometryError::Malformed(5)));
    }

    #[test]
    fn test_decode_invalid_character_is_malformed() {
        assert!(matches!(decode_polyline("_p~iF ps|U", 5), Err(GeometryError::Malformed(_))));
    }

    #[test]
    fn test_point_at_distance_endpoints() {
        let step = step_between(&[chicago(), st_louis()]);
        let geometry = step.geometry.as_deref().unwrap();
        let length = step.distance;

        let start = point_at_distance(geometry, 0.0).unwrap();
        assert!((start.lat - 41.8781).abs() < 1e-5);
        assert!((start.lng + 87.6298).abs() < 1e-5);

        let end = point_at_distance(geometry, length).unwrap();
        assert!((end.lat - 38.6270).abs() < 1e-5);
        assert!((end.lng + 90.1994).abs() < 1e-5);

        assert!(point_at_distance(geometry, length + 1.0).is_none());
    }

    #[test]
    fn test_point_at_distance_midpoint_interpolates() {
        let step = step_between(&[Coordinates::new(40.0, -100.0), Coordinates::new(40.0, -99.0)]);
        let mid = point_at_distance(step.geometry.as_deref().unwrap(), step.distance / 2.0).unwrap();

        assert!((mid.lat - 40.0).abs() < 1e-9);
        assert!((mid.lng + 99.5).abs() < 1e-9);
    }

    #[test]
    fn test_point_at_distance_zero_length_segment() {
        let point = Coordinates::new(35.0, -97.0);
        let geometry = encode_polyline(&[point, point], 5);

        let located = point_at_distance(&geometry, 0.0).unwrap();
        assert_eq!(located, point);
    }

    #[test]
    fn test_locate_on_step_distinguishes_failures() {
        assert_eq!(locate_on_step(None, 0.0), Err(GeometryError::NoGeometry));
        assert_eq!(locate_on_step(Some(""), 0.0), Err(GeometryError::NoGeometry));
        assert_eq!(locate_on_step(Some("_p~iF~ps|U"), 0.0), Err(GeometryError::TooFewPoints(1)));
        assert!(matches!(locate_on_step(Some("!!"), 0.0), Err(GeometryError::Malformed(0))));
        assert!(point_at_distance("!!", 0.0).is_none());
    }

    #[test]
    fn test_point_at_route_distance_crosses_legs_and_steps() {
        let a = Coordinates::new(40.0, -100.0);
        let b = Coordinates::new(40.0, -99.0);
        let c = Coordinates::new(40.0, -98.0);
        let d = Coordinates::new(40.0, -97.0);

        let legs = vec![
            leg_of(vec![step_between(&[a, b])]),
            leg_of(vec![step_between(&[b, c]), step_between(&[c, d])]),
        ];
        let first = legs[0].distance;
        let second_step = legs[1].steps[0].distance;
        let third_step = legs[1].steps[1].distance;

        // Halfway through the last step
        let target = first + second_step + third_step / 2.0;
        let point = point_at_route_distance(&legs, target).unwrap();
        assert!((point.lng + 97.5).abs() < 1e-6, "got {:?}", point);

        // Exactly at a leg boundary resolves to the end of the first leg
        let boundary = point_at_route_distance(&legs, first).unwrap();
        assert!((boundary.lng + 99.0).abs() < 1e-6);

        assert!(point_at_route_distance(&legs, first + second_step + third_step + 10.0).is_none());
    }

    #[test]
    fn test_route_with_missing_step_geometry_is_reported() {
        let legs = vec![leg_of(vec![RouteStep { distance: 500.0, geometry: None }])];

        assert_eq!(locate_on_route(&legs, 250.0), Err(GeometryError::NoGeometry));
        assert!(point_at_route_distance(&legs, 250.0).is_none());
    }

    #[test]
    fn test_route_with_zero_distance_legs() {
        let a = Coordinates::new(40.0, -100.0);
        let b = Coordinates::new(40.0, -99.0);
        let legs = vec![
            RouteLeg { distance: 0.0, duration: 0.0, steps: vec![] },
            leg_of(vec![step_between(&[a, b])]),
        ];

        let point = point_at_route_distance(&legs, legs[1].distance / 2.0).unwrap();
        assert!((point.lng + 99.5).abs() < 1e-6);
    }

    #[test]
    fn test_bad_leg_and_step_distances_count_as_zero() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(0.0, 1.0);

        for bad in [-5_000.0, f64::NAN, f64::INFINITY] {
            let good = step_between(&[a, b]);
            let half = good.distance / 2.0;
            let legs = vec![
                RouteLeg {
                    distance: bad,
                    duration: 0.0,
                    steps: vec![RouteStep { distance: bad, geometry: None }],
                },
                RouteLeg {
                    distance: good.distance,
                    duration: 0.0,
                    steps: vec![RouteStep { distance: bad, geometry: None }, good],
                },
            ];

            let point = locate_on_route(&legs, half)
                .unwrap_or_else(|e| panic!("leg distance {} broke the walk: {}", bad, e));
            assert!((point.lng - 0.5).abs() < 1e-6, "leg distance {} gave lng {}", bad, point.lng);
        }
    }

    #[test]
    fn test_empty_route_is_beyond_end() {
        assert!(matches!(
            locate_on_route(&[], 1.0),
            Err(GeometryError::BeyondEnd { .. })
        ));
    }
}
