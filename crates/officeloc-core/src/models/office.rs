//! Office records and their derived geometry information.

use geo::Polygon;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::srid::Srid;

/// Stable office identifier, assigned at creation and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfficeId(pub u64);

impl fmt::Display for OfficeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Information derived from an office's normalized geometry.
///
/// The default value (`false`, `0.0`, `0.0`, `0.0`) is reported whenever there
/// is no geometry or the spatial engine cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeometryInfo {
    pub is_valid: bool,
    /// Planar area in Web Mercator square meters
    pub area_m2: f64,
    /// Centroid latitude in WGS 84 degrees
    pub centroid_lat: f64,
    /// Centroid longitude in WGS 84 degrees
    pub centroid_lon: f64,
}

impl GeometryInfo {
    /// Tuple form `(is_valid, area, centroid_lat, centroid_lon)`
    pub fn as_tuple(&self) -> (bool, f64, f64, f64) {
        (self.is_valid, self.area_m2, self.centroid_lat, self.centroid_lon)
    }
}

/// A registered office and its polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Office {
    pub id: OfficeId,
    pub name: String,
    /// Polygon text exactly as supplied by the editor
    pub raw_wkt: Option<String>,
    pub source_srid: Srid,
    /// Repaired polygon in Web Mercator meters; the only geometry used for
    /// containment tests
    #[serde(skip)]
    pub geometry: Option<Polygon<f64>>,
    pub info: GeometryInfo,
}

impl Office {
    /// A freshly created office without any polygon
    pub fn new(id: OfficeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            raw_wkt: None,
            source_srid: Srid::default(),
            geometry: None,
            info: GeometryInfo::default(),
        }
    }

    pub fn has_geometry(&self) -> bool {
        self.geometry.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_office_has_no_geometry() {
        let office = Office::new(OfficeId(1), "Head Office");
        assert!(!office.has_geometry());
        assert_eq!(office.info.as_tuple(), (false, 0.0, 0.0, 0.0));
        assert_eq!(office.source_srid, Srid::Wgs84);
    }

    #[test]
    fn test_office_id_ordering() {
        let mut ids = vec![OfficeId(7), OfficeId(2), OfficeId(5)];
        ids.sort();
        assert_eq!(ids, vec![OfficeId(2), OfficeId(5), OfficeId(7)]);
    }
}
