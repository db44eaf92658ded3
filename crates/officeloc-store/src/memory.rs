//! In-memory storage for development, tests and the CLI's file-backed mode.
//!
//! All state sits behind a single lock so a geometry replacement and its
//! derived fields become visible together.

use async_trait::async_trait;
use geo::Point;
use officeloc_core::error::{OfficelocError, Result};
use officeloc_core::models::{
    AttendanceColumns, AttendanceEvent, AttendanceId, NewAttendance, Office, OfficeId,
    OfficeMatch,
};
use officeloc_geo::{matches_location, OfficeIndex};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::ports::{AttendanceStore, GeometryUpdate, OfficeStore};

#[derive(Default)]
struct State {
    offices: BTreeMap<OfficeId, Office>,
    index: OfficeIndex,
    next_office_id: u64,
    attendances: BTreeMap<AttendanceId, AttendanceEvent>,
    next_attendance_id: u64,
}

/// In-memory implementation of both storage ports
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Recreate an office under a known id, e.g. when reloading saved data.
    ///
    /// Later [`OfficeStore::create_office`] calls never reuse `id`.
    pub fn restore_office(&self, id: OfficeId, name: &str) -> Result<Office> {
        let mut state = self.write()?;
        let office = Office::new(id, name);
        state.offices.insert(id, office.clone());
        state.index.remove(id);
        state.next_office_id = state.next_office_id.max(id.0);
        Ok(office)
    }

    /// Highest office id handed out so far, deleted offices included
    pub fn last_office_id(&self) -> Result<u64> {
        Ok(self.read()?.next_office_id)
    }

    /// Never hand out an office id at or below `last`
    pub fn retire_office_ids(&self, last: u64) -> Result<()> {
        let mut state = self.write()?;
        state.next_office_id = state.next_office_id.max(last);
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| OfficelocError::Storage("Memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| OfficelocError::Storage("Memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl OfficeStore for MemoryStore {
    async fn create_office(&self, name: &str) -> Result<Office> {
        let mut state = self.write()?;
        state.next_office_id += 1;
        let office = Office::new(OfficeId(state.next_office_id), name);
        state.offices.insert(office.id, office.clone());
        Ok(office)
    }

    async fn get_office(&self, id: OfficeId) -> Result<Option<Office>> {
        let state = self.read()?;
        Ok(state.offices.get(&id).cloned())
    }

    async fn list_offices(&self) -> Result<Vec<Office>> {
        let state = self.read()?;
        Ok(state.offices.values().cloned().collect())
    }

    async fn rename_office(&self, id: OfficeId, name: &str) -> Result<Office> {
        let mut state = self.write()?;
        let office = state.offices.get_mut(&id).ok_or(OfficelocError::OfficeNotFound { id })?;
        office.name = name.to_string();
        Ok(office.clone())
    }

    async fn delete_office(&self, id: OfficeId) -> Result<()> {
        let mut state = self.write()?;
        if state.offices.remove(&id).is_none() {
            return Err(OfficelocError::OfficeNotFound { id });
        }
        state.index.remove(id);

        for event in state.attendances.values_mut() {
            if event.checkin_office == Some(id) {
                event.checkin_office = None;
            }
            if event.checkout_office == Some(id) {
                event.checkout_office = None;
            }
        }
        Ok(())
    }

    async fn replace_geometry(&self, id: OfficeId, update: GeometryUpdate) -> Result<Office> {
        let mut state = self.write()?;
        let State { offices, index, .. } = &mut *state;

        let office = offices.get_mut(&id).ok_or(OfficelocError::OfficeNotFound { id })?;
        office.raw_wkt = update.raw_wkt;
        office.source_srid = update.source_srid;
        office.geometry = update.geometry;
        office.info = update.info;

        match &office.geometry {
            Some(polygon) => index.insert(id, polygon),
            None => {
                index.remove(id);
            }
        }

        Ok(office.clone())
    }

    async fn locate(&self, point: &Point<f64>, tolerance: f64) -> Result<Option<OfficeMatch>> {
        let state = self.read()?;

        for id in state.index.candidates(point, tolerance) {
            let Some(office) = state.offices.get(&id) else {
                continue;
            };
            let Some(polygon) = office.geometry.as_ref() else {
                continue;
            };
            if office.info.is_valid && matches_location(polygon, point, tolerance) {
                return Ok(Some(OfficeMatch { id, name: office.name.clone() }));
            }
        }

        Ok(None)
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn insert_attendance(&self, new: &NewAttendance) -> Result<AttendanceEvent> {
        let mut state = self.write()?;
        state.next_attendance_id += 1;
        let event = AttendanceEvent::from_new(AttendanceId(state.next_attendance_id), new);
        state.attendances.insert(event.id, event.clone());
        Ok(event)
    }

    async fn get_attendance(&self, id: AttendanceId) -> Result<Option<AttendanceEvent>> {
        let state = self.read()?;
        Ok(state.attendances.get(&id).cloned())
    }

    async fn save_attendance(&self, event: &AttendanceEvent, columns: AttendanceColumns) -> Result<()> {
        let mut state = self.write()?;
        match state.attendances.get_mut(&event.id) {
            Some(stored) => {
                stored.copy_columns(event, columns);
                Ok(())
            }
            None => Err(OfficelocError::AttendanceNotFound { id: event.id }),
        }
    }

    async fn list_attendances(&self) -> Result<Vec<AttendanceEvent>> {
        let state = self.read()?;
        Ok(state.attendances.values().cloned().collect())
    }
}
