//! Raw polygon text -> stored geometry

use geo::Polygon;
use officeloc_core::error::Result;
use officeloc_core::models::Srid;

use crate::repair::make_valid;
use crate::transform::to_web_mercator;
use crate::wkt::{is_blank, parse_polygon};

/// Parse, reproject to Web Mercator and repair the polygon text of an office.
///
/// Blank text yields `Ok(None)`: the office has no polygon. Any failure along
/// the way is returned as is; callers decide whether it is fatal.
pub fn normalize_polygon(text: &str, srid: Srid) -> Result<Option<Polygon<f64>>> {
    if is_blank(text) {
        return Ok(None);
    }

    let parsed = parse_polygon(text)?;
    let projected = to_web_mercator(&parsed, srid)?;
    let repaired = make_valid(&projected)?;

    if repaired != projected {
        tracing::debug!("Repaired invalid polygon during normalization");
    }

    Ok(Some(repaired))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::is_valid;
    use officeloc_core::OfficelocError;

    #[test]
    fn test_blank_text_clears() {
        assert!(normalize_polygon("", Srid::Wgs84).unwrap().is_none());
        assert!(normalize_polygon("  ", Srid::WebMercator).unwrap().is_none());
    }

    #[test]
    fn test_wgs84_text_is_projected() {
        let polygon = normalize_polygon(
            "POLYGON((106.816 -6.2, 106.817 -6.2, 106.817 -6.199, 106.816 -6.199, 106.816 -6.2))",
            Srid::Wgs84,
        )
        .unwrap()
        .unwrap();

        let first = polygon.exterior().0[0];
        assert!((first.x - 11_890_702.73).abs() < 0.01);
        assert!((first.y - (-691_531.74)).abs() < 0.01);
    }

    #[test]
    fn test_mercator_text_is_kept() {
        let polygon = normalize_polygon("POLYGON((0 0, 100 0, 100 100, 0 100, 0 0))", Srid::WebMercator)
            .unwrap()
            .unwrap();
        assert_eq!(polygon.exterior().0[2].x, 100.0);
    }

    #[test]
    fn test_self_intersecting_text_is_repaired() {
        let polygon = normalize_polygon("POLYGON((0 0, 10 10, 10 0, 0 10, 0 0))", Srid::WebMercator)
            .unwrap()
            .unwrap();
        assert!(is_valid(&polygon));
    }

    #[test]
    fn test_failures_surface() {
        let err = normalize_polygon("POLYGON((0 0, 1 0", Srid::Wgs84).unwrap_err();
        assert!(matches!(err, OfficelocError::InvalidWkt { .. }));

        let err = normalize_polygon("POLYGON((0 90, 1 90, 1 89, 0 90))", Srid::Wgs84).unwrap_err();
        assert!(matches!(err, OfficelocError::Projection { .. }));

        let err = normalize_polygon("POLYGON((0 0, 5 0, 10 0, 0 0))", Srid::WebMercator).unwrap_err();
        assert!(matches!(err, OfficelocError::InvalidGeometry { .. }));
    }
}
