//! Office registry and geometry writes

use std::sync::Arc;

use geo::Polygon;
use officeloc_core::error::{OfficelocError, Result};
use officeloc_core::models::{GeometryInfo, Office, OfficeId, Srid};
use officeloc_geo::wkt::is_blank;
use officeloc_geo::{describe, normalize_polygon, to_wgs84};
use officeloc_store::ports::{GeometryUpdate, OfficeStore};

/// What happened to a geometry write
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryOutcome {
    /// A polygon was normalized and stored
    Applied(GeometryInfo),
    /// Blank text removed the polygon
    Cleared,
    /// A runtime failure turned the write into a no-op
    Skipped { reason: String },
}

/// Fields for a new office
#[derive(Debug, Clone, Default)]
pub struct NewOffice {
    pub name: String,
    pub wkt: Option<String>,
    pub srid: Option<Srid>,
}

/// Fields changed on an existing office; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct OfficeUpdate {
    pub name: Option<String>,
    pub wkt: Option<String>,
    pub srid: Option<Srid>,
}

impl OfficeUpdate {
    fn touches_geometry(&self) -> bool {
        self.wkt.is_some() || self.srid.is_some()
    }
}

/// Authoritative owner of office polygons.
///
/// Writes go through [`GeometryStore::set_geometry`], which normalizes the
/// raw text and persists it together with the derived info.
#[derive(Clone)]
pub struct GeometryStore {
    offices: Arc<dyn OfficeStore>,
    default_srid: Srid,
}

impl GeometryStore {
    pub fn new(offices: Arc<dyn OfficeStore>) -> Self {
        Self { offices, default_srid: Srid::default() }
    }

    /// Reference system assumed when a write does not name one
    pub fn with_default_srid(mut self, srid: Srid) -> Self {
        self.default_srid = srid;
        self
    }

    pub fn default_srid(&self) -> Srid {
        self.default_srid
    }

    /// Register an office, applying its polygon right after creation
    pub async fn create_office(&self, new: NewOffice) -> Result<Office> {
        let office = self.offices.create_office(new.name.trim()).await?;
        tracing::info!(office_id = %office.id, name = %office.name, "Office created");

        if let Some(wkt) = new.wkt.as_deref() {
            self.set_geometry(office.id, wkt, new.srid.unwrap_or(self.default_srid)).await?;
            return self.get_office(office.id).await;
        }

        Ok(office)
    }

    pub async fn get_office(&self, id: OfficeId) -> Result<Office> {
        self.offices.get_office(id).await?.ok_or(OfficelocError::OfficeNotFound { id })
    }

    /// All offices, ascending by id
    pub async fn list_offices(&self) -> Result<Vec<Office>> {
        self.offices.list_offices().await
    }

    /// Rename and/or re-apply the polygon. Only a change of text or reference
    /// system touches the geometry.
    pub async fn update_office(&self, id: OfficeId, update: OfficeUpdate) -> Result<Office> {
        let current = self.get_office(id).await?;

        if let Some(name) = update.name.as_deref() {
            self.offices.rename_office(id, name.trim()).await?;
        }

        if update.touches_geometry() {
            let wkt = update.wkt.as_deref().or(current.raw_wkt.as_deref()).unwrap_or("");
            let srid = update.srid.unwrap_or(current.source_srid);
            self.set_geometry(id, wkt, srid).await?;
        }

        self.get_office(id).await
    }

    pub async fn delete_office(&self, id: OfficeId) -> Result<()> {
        self.offices.delete_office(id).await?;
        tracing::info!(office_id = %id, "Office deleted");
        Ok(())
    }

    /// Replace an office's polygon with `wkt` interpreted in `srid`.
    ///
    /// Blank text clears the polygon. Parse, projection, repair and storage
    /// failures are logged and leave the office untouched; only a missing
    /// office is returned as an error.
    pub async fn set_geometry(&self, id: OfficeId, wkt: &str, srid: Srid) -> Result<GeometryOutcome> {
        // Surface a missing office even when the write itself would be skipped
        match self.offices.get_office(id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(OfficelocError::OfficeNotFound { id }),
            Err(e) => return skipped(id, e),
        }

        let update = if is_blank(wkt) {
            GeometryUpdate::cleared(None, srid)
        } else {
            match normalize_polygon(wkt, srid) {
                Ok(Some(polygon)) => match describe(&polygon) {
                    Ok(info) => GeometryUpdate {
                        raw_wkt: Some(wkt.to_string()),
                        source_srid: srid,
                        info,
                        geometry: Some(polygon),
                    },
                    Err(e) => return skipped(id, e),
                },
                Ok(None) => GeometryUpdate::cleared(None, srid),
                Err(e) => return skipped(id, e),
            }
        };

        let cleared = update.geometry.is_none();
        let info = update.info;

        match self.offices.replace_geometry(id, update).await {
            Ok(_) if cleared => {
                tracing::info!(office_id = %id, "Office geometry cleared");
                Ok(GeometryOutcome::Cleared)
            }
            Ok(_) => {
                tracing::info!(
                    office_id = %id,
                    srid = %srid,
                    area_m2 = info.area_m2,
                    "Office geometry applied"
                );
                Ok(GeometryOutcome::Applied(info))
            }
            Err(e) => skipped(id, e),
        }
    }

    /// Normalized polygon in Web Mercator, or `None`
    pub async fn get_geometry(&self, id: OfficeId) -> Result<Option<Polygon<f64>>> {
        match self.offices.get_office(id).await {
            Ok(Some(office)) => Ok(office.geometry),
            Ok(None) => Err(OfficelocError::OfficeNotFound { id }),
            Err(e) if e.is_recoverable() => {
                tracing::warn!(office_id = %id, error = %e, "Failed to read office geometry");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Normalized polygon converted back to WGS 84, for the map editor
    pub async fn get_geometry_wgs84(&self, id: OfficeId) -> Result<Option<Polygon<f64>>> {
        self.get_geometry(id).await?.map(|polygon| to_wgs84(&polygon)).transpose()
    }

    /// `(is_valid, area, centroid)`; the all-zero default without a polygon
    pub async fn compute_info(&self, id: OfficeId) -> Result<GeometryInfo> {
        match self.offices.get_office(id).await {
            Ok(Some(office)) if office.has_geometry() => Ok(office.info),
            Ok(Some(_)) => Ok(GeometryInfo::default()),
            Ok(None) => Err(OfficelocError::OfficeNotFound { id }),
            Err(e) if e.is_recoverable() => {
                tracing::warn!(office_id = %id, error = %e, "Failed to compute office geometry info");
                Ok(GeometryInfo::default())
            }
            Err(e) => Err(e),
        }
    }
}

fn skipped(id: OfficeId, e: OfficelocError) -> Result<GeometryOutcome> {
    if !e.is_recoverable() {
        return Err(e);
    }
    tracing::warn!(office_id = %id, error = %e, "Office geometry update skipped");
    Ok(GeometryOutcome::Skipped { reason: e.to_string() })
}
