//! Error types for officeloc

use thiserror::Error;

use crate::models::{AttendanceId, OfficeId};

#[derive(Debug, Error)]
pub enum OfficelocError {
    // Lookup errors
    #[error("Office not found: {id}")]
    OfficeNotFound { id: OfficeId },

    #[error("Attendance not found: {id}")]
    AttendanceNotFound { id: AttendanceId },

    // Geometry errors
    #[error("Invalid WKT: {reason}")]
    InvalidWkt { reason: String },

    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    #[error("Projection failed: {reason}")]
    Projection { reason: String },

    // Spatial engine errors
    #[error("Spatial engine unavailable: {reason}")]
    SpatialEngineUnavailable { reason: String },

    #[error("Spatial extension '{extension}' is not installed. {remediation}")]
    SpatialExtensionMissing {
        extension: String,
        remediation: String,
    },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl OfficelocError {
    /// Whether this is a runtime query failure that callers recover from
    /// with a fallback value instead of propagating.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            OfficelocError::InvalidWkt { .. }
                | OfficelocError::InvalidGeometry { .. }
                | OfficelocError::Projection { .. }
                | OfficelocError::SpatialEngineUnavailable { .. }
                | OfficelocError::Storage(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, OfficelocError>;
