use serde::{Deserialize, Serialize};

use super::office::OfficeId;

/// Sentinel location name returned when no office qualifies
pub const OUTSIDE_OFFICE: &str = "Outside Office";

/// Distance in Web Mercator meters within which a point still matches an
/// office polygon it lies outside of
pub const BOUNDARY_TOLERANCE_METERS: f64 = 5.0;

/// The office a coordinate resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeMatch {
    pub id: OfficeId,
    pub name: String,
}

/// Response of the location query endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationResult {
    pub fn new(office: Option<&OfficeMatch>, latitude: f64, longitude: f64) -> Self {
        let location = office
            .map(|m| m.name.clone())
            .unwrap_or_else(|| OUTSIDE_OFFICE.to_string());
        Self { location, latitude, longitude }
    }

    pub fn is_outside(&self) -> bool {
        self.location == OUTSIDE_OFFICE
    }
}
