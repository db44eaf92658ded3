//! Office tagging for attendance events

use std::sync::Arc;

use officeloc_core::error::{OfficelocError, Result};
use officeloc_core::models::{
    AttendanceColumns, AttendanceEvent, AttendanceId, AttendancePatch, NewAttendance, OfficeId,
};
use officeloc_store::ports::AttendanceStore;

use crate::resolver::LocationResolver;

/// Records attendance events and sets their check-in/check-out office
/// references whenever the matching coordinates are written.
#[derive(Clone)]
pub struct AttendanceTagger {
    attendances: Arc<dyn AttendanceStore>,
    resolver: LocationResolver,
}

impl AttendanceTagger {
    pub fn new(attendances: Arc<dyn AttendanceStore>, resolver: LocationResolver) -> Self {
        Self { attendances, resolver }
    }

    /// Store a new event, resolving every coordinate pair it carries
    pub async fn record(&self, new: NewAttendance) -> Result<AttendanceEvent> {
        let mut event = self.attendances.insert_attendance(&new).await?;

        event.checkin_office = self.office_for(event.check_in_coords()).await;
        event.checkout_office = self.office_for(event.check_out_coords()).await;

        if event.checkin_office.is_some() || event.checkout_office.is_some() {
            self.attendances.save_attendance(&event, AttendanceColumns::PAIRS).await?;
        }

        tracing::info!(
            attendance_id = %event.id,
            employee_id = event.employee_id,
            checkin_office = ?event.checkin_office,
            checkout_office = ?event.checkout_office,
            "Attendance recorded"
        );
        Ok(event)
    }

    /// Apply a patch. Only a pair with a written coordinate is re-resolved
    /// and written back; the other pair and its reference are left to
    /// whatever the store holds.
    pub async fn update(&self, id: AttendanceId, patch: AttendancePatch) -> Result<AttendanceEvent> {
        let mut event = self.get(id).await?;
        event.apply(&patch);

        let columns = patch.columns();
        if columns.check_in_pair {
            event.checkin_office = self.office_for(event.check_in_coords()).await;
        }
        if columns.check_out_pair {
            event.checkout_office = self.office_for(event.check_out_coords()).await;
        }

        if !columns.is_empty() {
            self.attendances.save_attendance(&event, columns).await?;
        }
        self.get(id).await
    }

    pub async fn get(&self, id: AttendanceId) -> Result<AttendanceEvent> {
        self.attendances
            .get_attendance(id)
            .await?
            .ok_or(OfficelocError::AttendanceNotFound { id })
    }

    pub async fn list(&self) -> Result<Vec<AttendanceEvent>> {
        self.attendances.list_attendances().await
    }

    async fn office_for(&self, coords: Option<(f64, f64)>) -> Option<OfficeId> {
        let (latitude, longitude) = coords?;
        self.resolver.find_office(latitude, longitude).await.map(|m| m.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GeometryStore, NewOffice};
    use chrono::Utc;
    use officeloc_core::models::Srid;
    use officeloc_store::ports::OfficeStore;
    use officeloc_store::MemoryStore;

    // Two 0.001 degree blocks, west and east
    const WEST: &str = "POLYGON((106.816 -6.2, 106.817 -6.2, 106.817 -6.199, 106.816 -6.199, 106.816 -6.2))";
    const EAST: &str = "POLYGON((106.820 -6.2, 106.821 -6.2, 106.821 -6.199, 106.820 -6.199, 106.820 -6.2))";

    const IN_WEST: (f64, f64) = (-6.1995, 106.8165);
    const IN_EAST: (f64, f64) = (-6.1995, 106.8205);
    const NOWHERE: (f64, f64) = (-6.1995, 106.8185);

    struct Fixture {
        tagger: AttendanceTagger,
        geometry: GeometryStore,
        west: OfficeId,
        east: OfficeId,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let offices: Arc<dyn OfficeStore> = store.clone();
        let geometry = GeometryStore::new(offices.clone());

        let mut ids = Vec::new();
        for (name, wkt) in [("West", WEST), ("East", EAST)] {
            let office = geometry
                .create_office(NewOffice {
                    name: name.to_string(),
                    wkt: Some(wkt.to_string()),
                    srid: Some(Srid::Wgs84),
                })
                .await
                .unwrap();
            ids.push(office.id);
        }

        Fixture {
            tagger: AttendanceTagger::new(store, LocationResolver::new(offices)),
            geometry,
            west: ids[0],
            east: ids[1],
        }
    }

    fn check_in_at((lat, lon): (f64, f64)) -> NewAttendance {
        NewAttendance {
            employee_id: 7,
            check_in: Utc::now(),
            check_out: None,
            in_latitude: Some(lat),
            in_longitude: Some(lon),
            out_latitude: None,
            out_longitude: None,
        }
    }

    #[tokio::test]
    async fn test_record_resolves_check_in() {
        let f = fixture().await;

        let event = f.tagger.record(check_in_at(IN_WEST)).await.unwrap();
        assert_eq!(event.checkin_office, Some(f.west));
        assert_eq!(event.checkout_office, None);

        let stored = f.tagger.get(event.id).await.unwrap();
        assert_eq!(stored, event);

        let outside = f.tagger.record(check_in_at(NOWHERE)).await.unwrap();
        assert_eq!(outside.checkin_office, None);
    }

    #[tokio::test]
    async fn test_record_resolves_both_pairs() {
        let f = fixture().await;
        let mut new = check_in_at(IN_WEST);
        new.out_latitude = Some(IN_EAST.0);
        new.out_longitude = Some(IN_EAST.1);

        let event = f.tagger.record(new).await.unwrap();
        assert_eq!(event.checkin_office, Some(f.west));
        assert_eq!(event.checkout_office, Some(f.east));
    }

    #[tokio::test]
    async fn test_update_check_out_leaves_check_in_alone() {
        let f = fixture().await;
        let event = f.tagger.record(check_in_at(IN_WEST)).await.unwrap();

        // Move the west office away; the stored check-in reference must not follow
        f.geometry.set_geometry(f.west, EAST, Srid::Wgs84).await.unwrap();

        let patch = AttendancePatch {
            check_out: Some(Some(Utc::now())),
            out_latitude: Some(Some(IN_EAST.0)),
            out_longitude: Some(Some(IN_EAST.1)),
            ..Default::default()
        };
        let updated = f.tagger.update(event.id, patch).await.unwrap();

        assert_eq!(updated.checkin_office, Some(f.west));
        // Both offices now cover the point; the lower id wins
        assert_eq!(updated.checkout_office, Some(f.west));
    }

    #[tokio::test]
    async fn test_partial_pair_update_uses_stored_coordinate() {
        let f = fixture().await;
        let event = f.tagger.record(check_in_at(IN_WEST)).await.unwrap();

        // Only the longitude moves east; latitude comes from the stored event
        let patch = AttendancePatch { in_longitude: Some(Some(IN_EAST.1)), ..Default::default() };
        let updated = f.tagger.update(event.id, patch).await.unwrap();

        assert_eq!(updated.in_latitude, Some(IN_WEST.0));
        assert_eq!(updated.checkin_office, Some(f.east));
    }

    #[tokio::test]
    async fn test_incomplete_pair_clears_reference() {
        let f = fixture().await;
        let event = f.tagger.record(check_in_at(IN_WEST)).await.unwrap();

        // A check-out latitude alone cannot be resolved
        let patch = AttendancePatch { out_latitude: Some(Some(IN_EAST.0)), ..Default::default() };
        let updated = f.tagger.update(event.id, patch).await.unwrap();

        assert_eq!(updated.checkout_office, None);
        assert_eq!(updated.checkin_office, Some(f.west));
    }

    #[tokio::test]
    async fn test_nulled_coordinate_clears_reference() {
        let f = fixture().await;
        let event = f.tagger.record(check_in_at(IN_WEST)).await.unwrap();
        assert_eq!(event.checkin_office, Some(f.west));

        let patch = AttendancePatch { in_longitude: Some(None), ..Default::default() };
        let updated = f.tagger.update(event.id, patch).await.unwrap();

        assert_eq!(updated.in_longitude, None);
        assert_eq!(updated.in_latitude, Some(IN_WEST.0));
        assert_eq!(updated.checkin_office, None);
    }

    #[tokio::test]
    async fn test_concurrent_pair_updates_keep_both() {
        let f = fixture().await;
        let event = f.tagger.record(check_in_at(NOWHERE)).await.unwrap();

        let check_in = AttendancePatch {
            in_latitude: Some(Some(IN_WEST.0)),
            in_longitude: Some(Some(IN_WEST.1)),
            ..Default::default()
        };
        let check_out = AttendancePatch {
            out_latitude: Some(Some(IN_EAST.0)),
            out_longitude: Some(Some(IN_EAST.1)),
            ..Default::default()
        };
        let (a, b) = tokio::join!(
            f.tagger.update(event.id, check_in),
            f.tagger.update(event.id, check_out)
        );
        a.unwrap();
        b.unwrap();

        let stored = f.tagger.get(event.id).await.unwrap();
        assert_eq!(stored.check_in_coords(), Some(IN_WEST));
        assert_eq!(stored.checkin_office, Some(f.west));
        assert_eq!(stored.check_out_coords(), Some(IN_EAST));
        assert_eq!(stored.checkout_office, Some(f.east));
    }

    #[tokio::test]
    async fn test_deleting_office_detaches_events() {
        let f = fixture().await;
        let event = f.tagger.record(check_in_at(IN_WEST)).await.unwrap();

        f.geometry.delete_office(f.west).await.unwrap();

        let stored = f.tagger.get(event.id).await.unwrap();
        assert_eq!(stored.checkin_office, None);
    }

    #[tokio::test]
    async fn test_unknown_attendance() {
        let f = fixture().await;
        let err = f.tagger.update(AttendanceId(404), AttendancePatch::default()).await.unwrap_err();
        assert!(matches!(err, OfficelocError::AttendanceNotFound { .. }));
    }
}
