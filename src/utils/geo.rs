use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_distance(*self, *other)
    }
}

/// Calculate distance between two coordinates using Haversine formula
/// Returns distance in kilometers
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points
    let c = 2.0 * h.min(1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Check if a point is within the given radius of a center
pub fn is_within_radius(point: Coordinate, center: Coordinate, max_radius_km: f64) -> bool {
    haversine_distance(point, center) <= max_radius_km
}

/// Sort items nearest-first relative to `origin`, pairing each with its distance
pub fn sort_by_distance<T, F>(items: Vec<T>, origin: Coordinate, location: F) -> Vec<(T, f64)>
where
    F: Fn(&T) -> Coordinate,
{
    let mut with_distance: Vec<(T, f64)> = items
        .into_iter()
        .map(|item| {
            let distance = haversine_distance(origin, location(&item));
            (item, distance)
        })
        .collect();

    with_distance.sort_by(|a, b| a.1.total_cmp(&b.1));
    with_distance
}
