//! Great-circle distance

use geo::{Distance, HaversineMeasure, Point};

/// Sphere radius used by [`haversine_meters`]
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_000.0;

const SPHERE: HaversineMeasure = HaversineMeasure::new(EARTH_MEAN_RADIUS_M);

/// Distance in meters between two WGS 84 coordinates along a sphere of
/// radius 6,371 km.
///
/// Arguments are in `(latitude, longitude)` order, degrees.
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let meters = SPHERE.distance(Point::new(lon1, lat1), Point::new(lon2, lat2));

    // Rounding can push the haversine term a hair above 1 for antipodal points
    if meters.is_nan() && [lat1, lon1, lat2, lon2].iter().all(|v| v.is_finite()) {
        return std::f64::consts::PI * EARTH_MEAN_RADIUS_M;
    }
    meters
}
