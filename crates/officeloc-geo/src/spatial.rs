//! Spatial predicates over normalized (Web Mercator) office polygons

use geo::{Area, Centroid, Covers, Distance, Euclidean, Point, Polygon};
use officeloc_core::error::Result;
use officeloc_core::models::GeometryInfo;

use crate::transform::mercator_to_lonlat;
use crate::validation::is_valid;

/// Whether the point lies inside the polygon or on its boundary
pub fn covers(polygon: &Polygon<f64>, point: &Point<f64>) -> bool {
    polygon.covers(point)
}

/// Planar distance from the point to the polygon; zero when covered
pub fn distance_to(polygon: &Polygon<f64>, point: &Point<f64>) -> f64 {
    Euclidean.distance(point, polygon)
}

/// The office matching rule: covered, or within `tolerance` of the polygon
pub fn matches_location(polygon: &Polygon<f64>, point: &Point<f64>, tolerance: f64) -> bool {
    covers(polygon, point) || distance_to(polygon, point) <= tolerance
}

/// Validity, planar area and WGS 84 centroid of a normalized polygon
pub fn describe(polygon: &Polygon<f64>) -> Result<GeometryInfo> {
    let (centroid_lat, centroid_lon) = match polygon.centroid() {
        Some(centroid) => {
            let lonlat = mercator_to_lonlat(centroid.x(), centroid.y())?;
            (lonlat.y, lonlat.x)
        }
        None => (0.0, 0.0),
    };

    Ok(GeometryInfo {
        is_valid: is_valid(polygon),
        area_m2: polygon.unsigned_area(),
        centroid_lat,
        centroid_lon,
    })
}
