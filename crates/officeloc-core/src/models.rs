pub mod attendance;
pub mod location;
pub mod office;
pub mod srid;

pub use attendance::{
    AttendanceColumns, AttendanceEvent, AttendanceId, AttendancePatch, NewAttendance,
};
pub use location::{LocationResult, OfficeMatch, BOUNDARY_TOLERANCE_METERS, OUTSIDE_OFFICE};
pub use office::{GeometryInfo, Office, OfficeId};
pub use srid::Srid;
