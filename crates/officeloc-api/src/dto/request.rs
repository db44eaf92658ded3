use officeloc_core::models::Srid;
use serde::Deserialize;
use serde_json::Value;

/// Location query body. Either field may hold any JSON value; anything that
/// is not a number or numeric string is read as `0.0`.
#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    #[serde(default)]
    pub latitude: Value,
    #[serde(default)]
    pub longitude: Value,
}

#[derive(Debug, Deserialize)]
pub struct DistanceRequest {
    pub lat1: f64,
    pub lon1: f64,
    pub lat2: f64,
    pub lon2: f64,
}

#[derive(Debug, Deserialize)]
pub struct CreateOfficeRequest {
    pub name: String,
    pub wkt: Option<String>,
    pub srid: Option<Srid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateOfficeRequest {
    pub name: Option<String>,
    pub wkt: Option<String>,
    pub srid: Option<Srid>,
}

/// Polygon text from the map editor; empty text removes the polygon
#[derive(Debug, Deserialize)]
pub struct SetGeometryRequest {
    #[serde(default)]
    pub wkt: String,
    pub srid: Option<Srid>,
}
