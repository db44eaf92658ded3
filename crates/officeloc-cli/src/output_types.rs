use officeloc_core::models::{LocationResult, Office};
use serde::Serialize;
use tabled::Tabled;

/// One office as shown by `office list` and `office show`
#[derive(Debug, Serialize, Tabled)]
pub struct OfficeRow {
    #[tabled(rename = "ID")]
    pub id: u64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "SRID")]
    pub srid: u32,
    #[tabled(rename = "Polygon")]
    pub has_geometry: bool,
    #[tabled(rename = "Valid")]
    pub is_valid: bool,
    #[tabled(rename = "Area (m²)", display_with = "display_area")]
    pub area_m2: f64,
    #[tabled(rename = "Centroid lat", display_with = "display_degrees")]
    pub centroid_lat: f64,
    #[tabled(rename = "Centroid lon", display_with = "display_degrees")]
    pub centroid_lon: f64,
}

impl From<&Office> for OfficeRow {
    fn from(office: &Office) -> Self {
        Self {
            id: office.id.0,
            name: office.name.clone(),
            srid: office.source_srid.epsg(),
            has_geometry: office.has_geometry(),
            is_valid: office.info.is_valid,
            area_m2: office.info.area_m2,
            centroid_lat: office.info.centroid_lat,
            centroid_lon: office.info.centroid_lon,
        }
    }
}

fn display_area(area: &f64) -> String {
    format!("{:.1}", area)
}

fn display_degrees(degrees: &f64) -> String {
    format!("{:.7}", degrees)
}

/// Output for `office show`
#[derive(Debug, Serialize)]
pub struct OfficeDetail {
    #[serde(flatten)]
    pub office: OfficeRow,
    pub raw_wkt: Option<String>,
    /// Stored polygon in WGS 84 with editor precision
    pub wkt_wgs84: Option<String>,
}

/// Output for geometry writes
#[derive(Debug, Serialize)]
pub struct GeometryOutput {
    pub office_id: u64,
    pub outcome: &'static str,
    pub reason: Option<String>,
}

/// Output for `resolve`
#[derive(Debug, Serialize)]
pub struct ResolveOutput {
    #[serde(flatten)]
    pub result: LocationResult,
    pub outside: bool,
}

/// Output for `distance`
#[derive(Debug, Serialize)]
pub struct DistanceOutput {
    pub meters: f64,
}

/// Output for `db check`
#[derive(Debug, Serialize)]
pub struct DbCheckOutput {
    pub connected: bool,
    pub postgis: bool,
    pub geometry_column: bool,
    pub pending_migrations: Vec<String>,
}

/// One configuration value and its source
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}
