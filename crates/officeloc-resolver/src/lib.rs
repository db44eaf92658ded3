//! officeloc Resolver - Geometry store and location resolution services
//!
//! [`GeometryStore`] is the only way office polygons are written or read,
//! [`LocationResolver`] turns a coordinate into an office (or "Outside
//! Office"), and [`AttendanceTagger`] keeps attendance events' office
//! references in step with their coordinates.
//!
//! Runtime failures inside these services are logged and replaced by a
//! fallback value; only "not found" and configuration errors reach callers.

pub mod attendance;
pub mod coerce;
pub mod geometry;
pub mod resolver;

pub use attendance::AttendanceTagger;
pub use coerce::{coerce_coordinate, coerce_pair};
pub use geometry::{GeometryOutcome, GeometryStore, NewOffice, OfficeUpdate};
pub use resolver::LocationResolver;
