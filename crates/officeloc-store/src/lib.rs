//! officeloc Store - Storage ports and adapters
//!
//! This crate defines the office and attendance storage ports and provides
//! an in-memory adapter and a PostgreSQL/PostGIS adapter.

pub mod memory;
pub mod ports;
pub mod postgres;

pub use memory::MemoryStore;
pub use ports::{AttendanceStore, GeometryUpdate, OfficeStore};
