//! Great-circle distance and radius filtering for map feeds.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Radius of the "near me" geofence.
pub const RADIUS_KM: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Anything that can be placed on the map.
pub trait Positioned {
    fn position(&self) -> LatLng;
}

impl Positioned for LatLng {
    fn position(&self) -> LatLng {
        *self
    }
}

/// Haversine distance in meters. No altitude correction and no antimeridian
/// handling; the dataset is regional.
pub fn distance_meters(a: LatLng, b: LatLng) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Keep the records within `radius_m` of `center`, preserving input order.
///
/// A missing center (location loading, denied or unsupported) is not an
/// error: the list is returned untouched.
pub fn filter_within_radius<T: Positioned>(
    records: Vec<T>,
    center: Option<LatLng>,
    radius_m: f64,
) -> Vec<T> {
    match center {
        None => records,
        Some(center) => records
            .into_iter()
            .filter(|r| distance_meters(center, r.position()) <= radius_m)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAECHI: LatLng = LatLng { lat: 37.4946, lng: 127.0631 };
    const CITY_HALL: LatLng = LatLng { lat: 37.5666805, lng: 126.9784147 };

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(distance_meters(DAECHI, DAECHI), 0.0);
        assert_eq!(distance_meters(CITY_HALL, CITY_HALL), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let ab = distance_meters(DAECHI, CITY_HALL);
        let ba = distance_meters(CITY_HALL, DAECHI);
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn test_distance_known_value() {
        // Gangnam to City Hall is roughly 11 km.
        let d = distance_meters(DAECHI, CITY_HALL);
        assert!(d > 10_000.0 && d < 12_500.0, "got {d}");
    }

    #[test]
    fn test_one_degree_latitude() {
        let d = distance_meters(LatLng::new(0.0, 0.0), LatLng::new(1.0, 0.0));
        assert!((d - 111_194.9).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_filter_without_center_is_identity() {
        let points = vec![DAECHI, CITY_HALL, LatLng::new(35.1, 129.0)];
        let out = filter_within_radius(points.clone(), None, 3000.0);
        assert_eq!(out, points);
    }

    #[test]
    fn test_filter_with_center_keeps_nearby_in_order() {
        let near_a = LatLng::new(37.4990, 127.0630);
        let near_b = LatLng::new(37.4900, 127.0700);
        let points = vec![near_a, CITY_HALL, near_b];
        let out = filter_within_radius(points, Some(DAECHI), 3000.0);
        assert_eq!(out, vec![near_a, near_b]);
        for p in &out {
            assert!(distance_meters(DAECHI, *p) <= 3000.0);
        }
    }

    #[test]
    fn test_filter_includes_center_itself() {
        let out = filter_within_radius(vec![DAECHI], Some(DAECHI), 0.0);
        assert_eq!(out.len(), 1);
    }
}
