//! WGS 84 <-> Web Mercator reprojection through PROJ
//!
//! Coordinates inside geometries are always `x = longitude`, `y = latitude`
//! (WKT order). Functions that take loose numbers use `(latitude, longitude)`
//! order, matching how callers receive them.

use geo::{Coord, MapCoords, Point, Polygon};
use officeloc_core::error::{OfficelocError, Result};
use officeloc_core::models::Srid;
use proj::Proj;

/// Semi-major axis of the Web Mercator sphere (EPSG:3857)
pub const WEB_MERCATOR_RADIUS: f64 = 6_378_137.0;

/// A WGS 84 <-> Web Mercator transformation, built once and reused for every
/// coordinate of a geometry
pub struct MercatorTransform {
    proj: Proj,
    inverse: bool,
}

impl MercatorTransform {
    /// EPSG:4326 (lon, lat) to EPSG:3857 meters
    pub fn forward() -> Result<Self> {
        Self::between(Srid::Wgs84, Srid::WebMercator).map(|proj| Self { proj, inverse: false })
    }

    /// EPSG:3857 meters to EPSG:4326 (lon, lat)
    pub fn inverse() -> Result<Self> {
        Self::between(Srid::WebMercator, Srid::Wgs84).map(|proj| Self { proj, inverse: true })
    }

    fn between(from: Srid, to: Srid) -> Result<Proj> {
        let from = format!("EPSG:{}", from.epsg());
        let to = format!("EPSG:{}", to.epsg());

        Proj::new_known_crs(&from, &to, None).map_err(|e| {
            OfficelocError::SpatialEngineUnavailable {
                reason: format!("Failed to create projection from {} to {}: {}", from, to, e),
            }
        })
    }

    /// Transform one coordinate, rejecting input outside the Web Mercator domain
    pub fn convert(&self, c: Coord<f64>) -> Result<Coord<f64>> {
        if !c.x.is_finite() || !c.y.is_finite() {
            return Err(OfficelocError::Projection {
                reason: format!("Coordinate ({}, {}) is not finite", c.x, c.y),
            });
        }
        if !self.inverse && c.y.abs() >= 90.0 {
            return Err(OfficelocError::Projection {
                reason: format!("Latitude {} is outside the Web Mercator domain", c.y),
            });
        }

        let (x, y) = self.proj.convert((c.x, c.y)).map_err(|e| OfficelocError::Projection {
            reason: format!("Projection failed: {}", e),
        })?;

        if !x.is_finite() || !y.is_finite() {
            return Err(OfficelocError::Projection {
                reason: format!("({}, {}) does not project to a finite value", c.x, c.y),
            });
        }
        Ok(Coord { x, y })
    }

    /// Transform every vertex of a polygon
    pub fn polygon(&self, polygon: &Polygon<f64>) -> Result<Polygon<f64>> {
        polygon.try_map_coords(|c| self.convert(c))
    }
}

/// Project a `(longitude, latitude)` coordinate in degrees to Web Mercator meters
pub fn lonlat_to_mercator(lon: f64, lat: f64) -> Result<Coord<f64>> {
    MercatorTransform::forward()?.convert(Coord { x: lon, y: lat })
}

/// Inverse of [`lonlat_to_mercator`]; returns `x = longitude`, `y = latitude`
pub fn mercator_to_lonlat(x: f64, y: f64) -> Result<Coord<f64>> {
    MercatorTransform::inverse()?.convert(Coord { x, y })
}

/// Project a WGS 84 point given as `(latitude, longitude)` to Web Mercator
pub fn project_point(latitude: f64, longitude: f64) -> Result<Point<f64>> {
    lonlat_to_mercator(longitude, latitude).map(Point::from)
}

/// Bring a polygon expressed in `srid` into Web Mercator meters
pub fn to_web_mercator(polygon: &Polygon<f64>, srid: Srid) -> Result<Polygon<f64>> {
    match srid {
        Srid::WebMercator => {
            let mut coords = polygon
                .exterior()
                .coords()
                .chain(polygon.interiors().iter().flat_map(|ring| ring.coords()));
            if coords.any(|c| !c.x.is_finite() || !c.y.is_finite()) {
                return Err(OfficelocError::Projection {
                    reason: "Polygon contains non-finite coordinates".to_string(),
                });
            }
            Ok(polygon.clone())
        }
        Srid::Wgs84 => MercatorTransform::forward()?.polygon(polygon),
    }
}

/// Bring a Web Mercator polygon back to WGS 84 degrees
pub fn to_wgs84(polygon: &Polygon<f64>) -> Result<Polygon<f64>> {
    MercatorTransform::inverse()?.polygon(polygon)
}
