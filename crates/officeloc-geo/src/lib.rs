//! officeloc Geo - Polygon normalization and spatial predicates
//!
//! This crate handles everything geometric: parsing polygon WKT, reprojecting
//! between WGS 84 and Web Mercator, validating and repairing rings, the
//! covers/within-distance predicates used for office resolution, and the
//! great-circle distance helper.

pub mod distance;
pub mod index;
pub mod normalize;
pub mod repair;
pub mod spatial;
pub mod transform;
pub mod validation;
pub mod wkt;

pub use distance::{haversine_meters, EARTH_MEAN_RADIUS_M};
pub use index::OfficeIndex;
pub use normalize::normalize_polygon;
pub use repair::make_valid;
pub use spatial::{covers, describe, distance_to, matches_location};
pub use transform::{project_point, to_wgs84, MercatorTransform};
pub use validation::{validate_polygon, ValidationResult};
