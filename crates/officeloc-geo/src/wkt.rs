//! Polygon WKT parsing and formatting
//!
//! Text comes from the map editor as `POLYGON((lon1 lat1, lon2 lat2, ..., lon1 lat1))`.

use std::fmt;
use std::str::FromStr;

use geo::{Geometry, LineString, Polygon};
use officeloc_core::error::{OfficelocError, Result};

/// Decimal places the editor emits for degrees
pub const EDITOR_PRECISION: usize = 7;

/// Empty or whitespace-only text means "no polygon"
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Parse WKT text into a single polygon.
///
/// A `MULTIPOLYGON` with exactly one member is accepted as that member; any
/// other geometry type is rejected.
pub fn parse_polygon(text: &str) -> Result<Polygon<f64>> {
    let parsed = ::wkt::Wkt::<f64>::from_str(text.trim())
        .map_err(|e| OfficelocError::InvalidWkt { reason: e.to_string() })?;

    let geometry = Geometry::<f64>::try_from(parsed)
        .map_err(|e| OfficelocError::InvalidWkt { reason: e.to_string() })?;

    match geometry {
        Geometry::Polygon(polygon) => Ok(polygon),
        Geometry::MultiPolygon(multi) if multi.0.len() == 1 => {
            Ok(multi.0.into_iter().next().unwrap_or_else(empty_polygon))
        }
        other => Err(OfficelocError::InvalidWkt {
            reason: format!("Expected a single POLYGON, found {}", geometry_name(&other)),
        }),
    }
}

/// Format a polygon as WKT with a fixed number of decimals
pub fn format_polygon(polygon: &Polygon<f64>, precision: usize) -> String {
    PolygonWkt { polygon, precision: Some(precision) }.to_string()
}

/// Format a polygon as WKT keeping full `f64` precision
pub fn format_polygon_exact(polygon: &Polygon<f64>) -> String {
    PolygonWkt { polygon, precision: None }.to_string()
}

/// `POLYGON((x y, ...),(x y, ...))` rendering of a polygon
pub struct PolygonWkt<'a> {
    pub polygon: &'a Polygon<f64>,
    /// Decimal places, or the shortest exact form when `None`
    pub precision: Option<usize>,
}

impl fmt::Display for PolygonWkt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("POLYGON(")?;
        let rings = std::iter::once(self.polygon.exterior()).chain(self.polygon.interiors());
        for (i, ring) in rings.enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            self.write_ring(f, ring)?;
        }
        f.write_str(")")
    }
}

impl PolygonWkt<'_> {
    fn write_ring(&self, f: &mut fmt::Formatter<'_>, ring: &LineString<f64>) -> fmt::Result {
        f.write_str("(")?;
        for (i, c) in ring.coords().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match self.precision {
                Some(precision) => write!(f, "{:.*} {:.*}", precision, c.x, precision, c.y)?,
                None => write!(f, "{} {}", c.x, c.y)?,
            }
        }
        f.write_str(")")
    }
}

fn empty_polygon() -> Polygon<f64> {
    Polygon::new(LineString::new(vec![]), vec![])
}

fn geometry_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "POINT",
        Geometry::Line(_) => "LINE",
        Geometry::LineString(_) => "LINESTRING",
        Geometry::Polygon(_) => "POLYGON",
        Geometry::MultiPoint(_) => "MULTIPOINT",
        Geometry::MultiLineString(_) => "MULTILINESTRING",
        Geometry::MultiPolygon(_) => "MULTIPOLYGON",
        Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
        Geometry::Rect(_) => "RECT",
        Geometry::Triangle(_) => "TRIANGLE",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_editor_output() {
        let text = "POLYGON((106.8160000 -6.2000000, 106.8170000 -6.2000000, \
                    106.8170000 -6.2010000, 106.8160000 -6.2000000))";
        let polygon = parse_polygon(text).unwrap();

        let first = polygon.exterior().0[0];
        // WKT is lon-lat: x holds the longitude
        assert_eq!(first.x, 106.816);
        assert_eq!(first.y, -6.2);
        assert_eq!(polygon.exterior().0.len(), 4);
    }

    #[test]
    fn test_parse_single_member_multipolygon() {
        let polygon = parse_polygon("MULTIPOLYGON(((0 0, 1 0, 1 1, 0 0)))").unwrap();
        assert_eq!(polygon.exterior().0.len(), 4);
    }

    #[test]
    fn test_parse_rejects_other_types() {
        let err = parse_polygon("POINT(1 2)").unwrap_err();
        assert!(err.to_string().contains("POINT"));

        assert!(parse_polygon("MULTIPOLYGON(((0 0, 1 0, 1 1, 0 0)),((5 5, 6 5, 6 6, 5 5)))")
            .is_err());
        assert!(parse_polygon("POLYGON((0 0, 1 0").is_err());
        assert!(parse_polygon("not wkt at all").is_err());
    }

    #[test]
    fn test_blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank("   \n\t"));
        assert!(!is_blank("POLYGON((0 0, 1 0, 1 1, 0 0))"));
    }

    #[test]
    fn test_format_editor_precision() {
        let polygon = parse_polygon("POLYGON((106.816 -6.2, 106.817 -6.2, 106.817 -6.201, 106.816 -6.2))")
            .unwrap();
        assert_eq!(
            format_polygon(&polygon, EDITOR_PRECISION),
            "POLYGON((106.8160000 -6.2000000, 106.8170000 -6.2000000, \
             106.8170000 -6.2010000, 106.8160000 -6.2000000))"
        );
    }

    #[test]
    fn test_exact_format_reparses_identically() {
        let polygon = parse_polygon(
            "POLYGON((11890702.728574311 -691531.7440853077, 11890802.1 -691531.7440853077, \
             11890802.1 -691431.3, 11890702.728574311 -691531.7440853077))",
        )
        .unwrap();
        let reparsed = parse_polygon(&format_polygon_exact(&polygon)).unwrap();
        assert_eq!(reparsed, polygon);
    }

    #[test]
    fn test_display_writes_every_ring() {
        let polygon = parse_polygon("POLYGON((0 0, 10 0, 10 10, 0 0),(1 1, 2 1, 2 2, 1 1))").unwrap();
        let wkt = PolygonWkt { polygon: &polygon, precision: Some(1) };
        assert_eq!(
            format!("{}", wkt),
            "POLYGON((0.0 0.0, 10.0 0.0, 10.0 10.0, 0.0 0.0),(1.0 1.0, 2.0 1.0, 2.0 2.0, 1.0 1.0))"
        );
    }
}
