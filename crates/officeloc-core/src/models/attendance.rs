//! Attendance events tagged with the office they were recorded at.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::office::OfficeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceId(pub u64);

impl fmt::Display for AttendanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fields supplied when an attendance is recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAttendance {
    pub employee_id: u64,
    pub check_in: DateTime<Utc>,
    #[serde(default)]
    pub check_out: Option<DateTime<Utc>>,
    #[serde(default)]
    pub in_latitude: Option<f64>,
    #[serde(default)]
    pub in_longitude: Option<f64>,
    #[serde(default)]
    pub out_latitude: Option<f64>,
    #[serde(default)]
    pub out_longitude: Option<f64>,
}

/// Fields written by an attendance update.
///
/// The outer `Option` says whether the field was written; the inner one is
/// the written value, where `None` stores null.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AttendancePatch {
    #[serde(default, deserialize_with = "written", skip_serializing_if = "Option::is_none")]
    pub check_out: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "written", skip_serializing_if = "Option::is_none")]
    pub in_latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "written", skip_serializing_if = "Option::is_none")]
    pub in_longitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "written", skip_serializing_if = "Option::is_none")]
    pub out_latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "written", skip_serializing_if = "Option::is_none")]
    pub out_longitude: Option<Option<f64>>,
}

/// A present field, `null` included, is a written field
fn written<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl AttendancePatch {
    /// Whether the check-in coordinate pair was written
    pub fn touches_check_in(&self) -> bool {
        self.in_latitude.is_some() || self.in_longitude.is_some()
    }

    /// Whether the check-out coordinate pair was written
    pub fn touches_check_out(&self) -> bool {
        self.out_latitude.is_some() || self.out_longitude.is_some()
    }

    /// Column groups this patch writes
    pub fn columns(&self) -> AttendanceColumns {
        AttendanceColumns {
            check_out: self.check_out.is_some(),
            check_in_pair: self.touches_check_in(),
            check_out_pair: self.touches_check_out(),
        }
    }
}

/// Column groups of a stored attendance that a write replaces.
///
/// A pair group covers both coordinates and the office reference resolved
/// from them. Groups left out keep their stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttendanceColumns {
    pub check_out: bool,
    pub check_in_pair: bool,
    pub check_out_pair: bool,
}

impl AttendanceColumns {
    /// Both coordinate pairs and their office references
    pub const PAIRS: Self = Self { check_out: false, check_in_pair: true, check_out_pair: true };

    pub fn is_empty(&self) -> bool {
        !(self.check_out || self.check_in_pair || self.check_out_pair)
    }
}

/// A recorded attendance with its resolved office references.
///
/// The office references are read-only from the outside; they are set by the
/// resolver whenever the matching coordinates are recorded or changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceEvent {
    pub id: AttendanceId,
    pub employee_id: u64,
    pub check_in: DateTime<Utc>,
    pub check_out: Option<DateTime<Utc>>,
    pub in_latitude: Option<f64>,
    pub in_longitude: Option<f64>,
    pub out_latitude: Option<f64>,
    pub out_longitude: Option<f64>,
    pub checkin_office: Option<OfficeId>,
    pub checkout_office: Option<OfficeId>,
}

impl AttendanceEvent {
    pub fn from_new(id: AttendanceId, new: &NewAttendance) -> Self {
        Self {
            id,
            employee_id: new.employee_id,
            check_in: new.check_in,
            check_out: new.check_out,
            in_latitude: new.in_latitude,
            in_longitude: new.in_longitude,
            out_latitude: new.out_latitude,
            out_longitude: new.out_longitude,
            checkin_office: None,
            checkout_office: None,
        }
    }

    /// Overwrite the written fields. Office references are left alone.
    pub fn apply(&mut self, patch: &AttendancePatch) {
        if let Some(check_out) = patch.check_out {
            self.check_out = check_out;
        }
        if let Some(lat) = patch.in_latitude {
            self.in_latitude = lat;
        }
        if let Some(lon) = patch.in_longitude {
            self.in_longitude = lon;
        }
        if let Some(lat) = patch.out_latitude {
            self.out_latitude = lat;
        }
        if let Some(lon) = patch.out_longitude {
            self.out_longitude = lon;
        }
    }

    /// Copy the given column groups from `other`
    pub fn copy_columns(&mut self, other: &AttendanceEvent, columns: AttendanceColumns) {
        if columns.check_out {
            self.check_out = other.check_out;
        }
        if columns.check_in_pair {
            self.in_latitude = other.in_latitude;
            self.in_longitude = other.in_longitude;
            self.checkin_office = other.checkin_office;
        }
        if columns.check_out_pair {
            self.out_latitude = other.out_latitude;
            self.out_longitude = other.out_longitude;
            self.checkout_office = other.checkout_office;
        }
    }

    /// `(latitude, longitude)` of the check-in, when both are known
    pub fn check_in_coords(&self) -> Option<(f64, f64)> {
        Some((self.in_latitude?, self.in_longitude?))
    }

    /// `(latitude, longitude)` of the check-out, when both are known
    pub fn check_out_coords(&self) -> Option<(f64, f64)> {
        Some((self.out_latitude?, self.out_longitude?))
    }
}
