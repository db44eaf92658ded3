use std::sync::Arc;

use officeloc_core::models::Srid;
use officeloc_resolver::{AttendanceTagger, GeometryStore, LocationResolver};
use officeloc_store::ports::{AttendanceStore, OfficeStore};
use officeloc_store::MemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub geometry: GeometryStore,
    pub resolver: LocationResolver,
    pub attendance: AttendanceTagger,
}

impl AppState {
    pub fn new(
        offices: Arc<dyn OfficeStore>,
        attendances: Arc<dyn AttendanceStore>,
        default_srid: Srid,
    ) -> Self {
        let resolver = LocationResolver::new(offices.clone());
        Self {
            geometry: GeometryStore::new(offices).with_default_srid(default_srid),
            attendance: AttendanceTagger::new(attendances, resolver.clone()),
            resolver,
        }
    }

    /// State backed by a fresh in-memory store
    pub fn in_memory(default_srid: Srid) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store, default_srid)
    }
}
