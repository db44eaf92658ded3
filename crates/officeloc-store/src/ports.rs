use async_trait::async_trait;
use geo::{Point, Polygon};
use officeloc_core::error::Result;
use officeloc_core::models::{
    AttendanceColumns, AttendanceEvent, AttendanceId, GeometryInfo, NewAttendance, Office, OfficeId, OfficeMatch,
    Srid,
};

/// Everything written when an office's polygon changes.
///
/// Adapters persist all fields in one atomic step so the normalized geometry
/// and its derived info never disagree with the raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryUpdate {
    pub raw_wkt: Option<String>,
    pub source_srid: Srid,
    /// Normalized polygon in Web Mercator meters, `None` to clear
    pub geometry: Option<Polygon<f64>>,
    pub info: GeometryInfo,
}

impl GeometryUpdate {
    /// An update that removes the polygon
    pub fn cleared(raw_wkt: Option<String>, source_srid: Srid) -> Self {
        Self { raw_wkt, source_srid, geometry: None, info: GeometryInfo::default() }
    }
}

/// Port for office records and their geometry
#[async_trait]
pub trait OfficeStore: Send + Sync {
    /// Create an office without a polygon
    async fn create_office(&self, name: &str) -> Result<Office>;

    /// Retrieve an office by ID
    async fn get_office(&self, id: OfficeId) -> Result<Option<Office>>;

    /// All offices in ascending id order
    async fn list_offices(&self) -> Result<Vec<Office>>;

    /// Change an office's name
    async fn rename_office(&self, id: OfficeId, name: &str) -> Result<Office>;

    /// Delete an office. Attendance references to it become null.
    async fn delete_office(&self, id: OfficeId) -> Result<()>;

    /// Replace the raw text, normalized geometry and derived info of an office
    async fn replace_geometry(&self, id: OfficeId, update: GeometryUpdate) -> Result<Office>;

    /// First office, in ascending id order, whose valid geometry covers the
    /// Web Mercator point or lies within `tolerance` meters of it
    async fn locate(&self, point: &Point<f64>, tolerance: f64) -> Result<Option<OfficeMatch>>;
}

/// Port for attendance events
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Record a new attendance without office references
    async fn insert_attendance(&self, new: &NewAttendance) -> Result<AttendanceEvent>;

    /// Retrieve an attendance by ID
    async fn get_attendance(&self, id: AttendanceId) -> Result<Option<AttendanceEvent>>;

    /// Write the `columns` groups of `event` in one atomic step. Groups left
    /// out keep whatever is stored, so concurrent writes to different groups
    /// do not undo each other.
    async fn save_attendance(&self, event: &AttendanceEvent, columns: AttendanceColumns) -> Result<()>;

    /// All attendances in ascending id order
    async fn list_attendances(&self) -> Result<Vec<AttendanceEvent>>;
}
