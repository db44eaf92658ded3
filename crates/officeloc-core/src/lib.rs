//! officeloc Core - Domain models, errors, and configuration
//!
//! This crate contains the types shared by every officeloc crate: office and
//! attendance models, the spatial reference tags, the error type and the
//! layered configuration.

pub mod config;
pub mod error;
pub mod models;

pub use error::{OfficelocError, Result};
