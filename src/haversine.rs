//! Great-circle geometry and the straight-line route provider.
//!
//! The straight-line provider is the fallback when no mapping service is
//! configured. It ignores roads and always answers.

use crate::error::ProviderError;
use crate::model::{OptimizedRoute, RouteRequest, TrafficTag, Waypoint};
use crate::traits::RouteProvider;

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Average driving speed assumption for straight-line estimates.
pub const FALLBACK_SPEED_KMH: f64 = 50.0;

pub fn to_radians(deg: f64) -> f64 {
    deg.to_radians()
}

/// Haversine distance between two waypoints in kilometers.
pub fn distance_km(a: &Waypoint, b: &Waypoint) -> f64 {
    let lat1_rad = to_radians(a.latitude);
    let lat2_rad = to_radians(b.latitude);
    let delta_lat = to_radians(b.latitude - a.latitude);
    let delta_lng = to_radians(b.longitude - a.longitude);

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Initial bearing from `a` to `b` in degrees, in `[0, 360)`.
pub fn bearing_deg(a: &Waypoint, b: &Waypoint) -> f64 {
    let lat1 = to_radians(a.latitude);
    let lat2 = to_radians(b.latitude);
    let delta_lng = to_radians(b.longitude - a.longitude);

    let y = delta_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lng.cos();

    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// Sum of consecutive-point distances along a path.
pub fn path_length_km(path: &[Waypoint]) -> f64 {
    path.windows(2).map(|pair| distance_km(&pair[0], &pair[1])).sum()
}

/// Index of the path point closest to `point`; ties go to the lowest index.
pub fn nearest_index(path: &[Waypoint], point: &Waypoint) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in path.iter().enumerate() {
        let dist = distance_km(candidate, point);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((index, dist)),
        }
    }
    best.map(|(index, _)| index)
}

/// Straight-line route provider.
///
/// The path is the request's points in order. Distance only counts
/// origin to destination, so intermediate detours are not priced.
#[derive(Debug, Clone)]
pub struct StraightLine {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for StraightLine {
    fn default() -> Self {
        Self {
            speed_kmh: FALLBACK_SPEED_KMH,
        }
    }
}

impl StraightLine {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    fn km_to_minutes(&self, km: f64) -> f64 {
        (km / self.speed_kmh) * 60.0
    }
}

impl RouteProvider for StraightLine {
    fn name(&self) -> &'static str {
        "straight_line"
    }

    fn compute_route(&self, request: &RouteRequest) -> Result<OptimizedRoute, ProviderError> {
        let path = request.points().into_iter().cloned().collect();
        let total_distance_km = distance_km(&request.origin, &request.destination);

        Ok(OptimizedRoute {
            path,
            total_distance_km,
            estimated_duration_min: self.km_to_minutes(total_distance_km),
            estimated_fuel_cost: 0.0,
            estimated_toll_cost: 0.0,
            traffic_conditions: TrafficTag::Estimated,
            waypoints: request.waypoints.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VehicleClass;

    fn wp(lat: f64, lng: f64) -> Waypoint {
        Waypoint::new(lat, lng)
    }

    #[test]
    fn test_to_radians() {
        assert!((to_radians(180.0) - std::f64::consts::PI).abs() < 1e-12);
        assert!((to_radians(-90.0) + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_haversine_same_point() {
        let dist = distance_km(&wp(36.1, -115.1), &wp(36.1, -115.1));
        assert_eq!(dist, 0.0);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Las Vegas to Los Angeles, ~370 km
        let dist = distance_km(&wp(36.17, -115.14), &wp(34.05, -118.24));
        assert!(dist > 350.0 && dist < 400.0, "LV to LA should be ~370km, got {}", dist);
    }

    #[test]
    fn test_haversine_symmetric() {
        let pairs = [
            (wp(36.17, -115.14), wp(34.05, -118.24)),
            (wp(-33.86, 151.2), wp(51.5, -0.12)),
            (wp(0.0, 179.5), wp(0.0, -179.5)),
        ];
        for (a, b) in pairs {
            assert!((distance_km(&a, &b) - distance_km(&b, &a)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_one_degree_at_equator() {
        let dist = distance_km(&wp(0.0, 0.0), &wp(0.0, 1.0));
        assert!((dist - 111.19).abs() < 0.01, "got {}", dist);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = wp(0.0, 0.0);
        assert!((bearing_deg(&origin, &wp(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((bearing_deg(&origin, &wp(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((bearing_deg(&origin, &wp(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((bearing_deg(&origin, &wp(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_nearest_index_prefers_lowest_on_tie() {
        let path = vec![wp(0.0, 0.0), wp(0.0, 1.0), wp(0.0, 0.0)];
        assert_eq!(nearest_index(&path, &wp(0.0, 0.1)), Some(0));
        assert_eq!(nearest_index(&path, &wp(0.0, 0.9)), Some(1));
        assert_eq!(nearest_index(&[], &wp(0.0, 0.0)), None);
    }

    #[test]
    fn test_path_length() {
        let path = vec![wp(0.0, 0.0), wp(0.0, 1.0), wp(0.0, 2.0)];
        let direct = distance_km(&wp(0.0, 0.0), &wp(0.0, 2.0));
        assert!((path_length_km(&path) - direct).abs() < 1e-6);
        assert_eq!(path_length_km(&path[..1]), 0.0);
    }

    #[test]
    fn test_fallback_path_shape() {
        let request = RouteRequest::new(wp(0.0, 0.0), wp(0.0, 1.0), VehicleClass::Car);
        let route = StraightLine::default().compute_route(&request).unwrap();

        assert_eq!(route.path, vec![wp(0.0, 0.0), wp(0.0, 1.0)]);
        assert!((route.total_distance_km - 111.2).abs() < 0.05);
        assert!((route.estimated_duration_min - 133.4).abs() < 0.1);
        assert_eq!(route.traffic_conditions, TrafficTag::Estimated);
        assert!(route.waypoints.is_empty());
    }

    #[test]
    fn test_fallback_ignores_waypoints_for_distance() {
        let request = RouteRequest::new(wp(0.0, 0.0), wp(0.0, 1.0), VehicleClass::Van)
            .with_waypoints(vec![wp(1.0, 0.5), wp(-1.0, 0.5)]);
        let route = StraightLine::default().compute_route(&request).unwrap();

        assert_eq!(route.path.len(), request.waypoints.len() + 2);
        assert_eq!(route.path[1], wp(1.0, 0.5));
        assert_eq!(route.path[2], wp(-1.0, 0.5));
        assert!((route.total_distance_km - distance_km(&wp(0.0, 0.0), &wp(0.0, 1.0))).abs() < 1e-12);
        assert_eq!(route.waypoints, request.waypoints);
    }

    #[test]
    fn test_reasonable_travel_time() {
        // 10 km at 40 km/h = 15 minutes
        let provider = StraightLine::new(40.0);
        assert!((provider.km_to_minutes(10.0) - 15.0).abs() < 1e-9);
    }
}
