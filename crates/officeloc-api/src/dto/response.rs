use officeloc_core::models::{GeometryInfo, Office};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok", service: "officeloc-api" }
    }
}

#[derive(Debug, Serialize)]
pub struct DistanceResponse {
    pub meters: f64,
}

/// Office response
#[derive(Debug, Serialize)]
pub struct OfficeResponse {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_wkt: Option<String>,
    pub srid: u32,
    pub has_geometry: bool,
    pub is_valid: bool,
    pub area_m2: f64,
    pub centroid_lat: f64,
    pub centroid_lon: f64,
}

impl From<Office> for OfficeResponse {
    fn from(office: Office) -> Self {
        let has_geometry = office.has_geometry();
        let GeometryInfo { is_valid, area_m2, centroid_lat, centroid_lon } = office.info;
        Self {
            id: office.id.0,
            name: office.name,
            raw_wkt: office.raw_wkt,
            srid: office.source_srid.epsg(),
            has_geometry,
            is_valid,
            area_m2,
            centroid_lat,
            centroid_lon,
        }
    }
}

/// Stored polygon for the map editor, in WGS 84. Both fields are null when
/// the office has no polygon.
#[derive(Debug, Serialize)]
pub struct GeometryResponse {
    pub office_id: u64,
    pub wkt: Option<String>,
    pub geojson: Option<geojson::Geometry>,
}

/// Geometry write response
#[derive(Debug, Serialize)]
pub struct GeometryWriteResponse {
    /// `applied`, `cleared` or `skipped`
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub office: OfficeResponse,
}
