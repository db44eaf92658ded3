//! Spatial reference identifiers accepted for office polygons.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{OfficelocError, Result};

/// Reference system a polygon's raw coordinates are expressed in.
///
/// Serialized as the bare EPSG code (`4326` / `3857`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Srid {
    /// WGS 84 geographic degrees, vertices are `(longitude, latitude)`
    #[default]
    Wgs84,
    /// Web Mercator projected meters, vertices are `(x, y)`
    WebMercator,
}

impl Srid {
    /// EPSG code of this reference system
    pub fn epsg(&self) -> u32 {
        match self {
            Srid::Wgs84 => 4326,
            Srid::WebMercator => 3857,
        }
    }

    /// Human readable label, as shown next to the selection in the editor
    pub fn label(&self) -> &'static str {
        match self {
            Srid::Wgs84 => "EPSG:4326 (WGS84)",
            Srid::WebMercator => "EPSG:3857 (Web Mercator)",
        }
    }

    /// Look up a reference system by EPSG code
    pub fn from_epsg(epsg: u32) -> Result<Self> {
        match epsg {
            4326 => Ok(Srid::Wgs84),
            3857 => Ok(Srid::WebMercator),
            other => Err(OfficelocError::ConfigInvalid {
                key: "srid".to_string(),
                reason: format!("Unsupported SRID {}. Use 4326 or 3857", other),
            }),
        }
    }
}

impl fmt::Display for Srid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

impl From<Srid> for u32 {
    fn from(srid: Srid) -> Self {
        srid.epsg()
    }
}

/// `INTEGER` column form of the EPSG code
impl From<Srid> for i32 {
    fn from(srid: Srid) -> Self {
        match srid {
            Srid::Wgs84 => 4326,
            Srid::WebMercator => 3857,
        }
    }
}

impl TryFrom<u32> for Srid {
    type Error = OfficelocError;

    fn try_from(epsg: u32) -> Result<Self> {
        Srid::from_epsg(epsg)
    }
}

impl FromStr for Srid {
    type Err = OfficelocError;

    /// Accepts `4326`, `EPSG:4326`, `wgs84`, `3857`, `EPSG:3857`, `webmercator`
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        let code = normalized.strip_prefix("epsg:").unwrap_or(&normalized);

        match code {
            "wgs84" | "wgs 84" => Ok(Srid::Wgs84),
            "webmercator" | "web-mercator" | "web_mercator" => Ok(Srid::WebMercator),
            _ => {
                let epsg = code.parse::<u32>().map_err(|_| OfficelocError::ConfigInvalid {
                    key: "srid".to_string(),
                    reason: format!("Invalid SRID '{}'. Use 4326 or 3857", s),
                })?;
                Srid::from_epsg(epsg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert_eq!("4326".parse::<Srid>().unwrap(), Srid::Wgs84);
        assert_eq!("EPSG:3857".parse::<Srid>().unwrap(), Srid::WebMercator);
        assert_eq!(" wgs84 ".parse::<Srid>().unwrap(), Srid::Wgs84);
        assert!("32748".parse::<Srid>().is_err());
        assert!("mercator-ish".parse::<Srid>().is_err());
    }

    #[test]
    fn test_serde_as_epsg_code() {
        let json = serde_json::to_string(&Srid::WebMercator).unwrap();
        assert_eq!(json, "3857");

        let parsed: Srid = serde_json::from_str("4326").unwrap();
        assert_eq!(parsed, Srid::Wgs84);

        assert!(serde_json::from_str::<Srid>("900913").is_err());
    }

    #[test]
    fn test_integer_column_matches_epsg() {
        for srid in [Srid::Wgs84, Srid::WebMercator] {
            assert_eq!(i64::from(i32::from(srid)), i64::from(srid.epsg()));
        }
    }

    #[test]
    fn test_default_is_wgs84() {
        assert_eq!(Srid::default(), Srid::Wgs84);
        assert_eq!(Srid::default().to_string(), "EPSG:4326");
    }
}
