//! Coordinate -> office resolution

use std::sync::Arc;

use officeloc_core::models::{LocationResult, OfficeMatch, BOUNDARY_TOLERANCE_METERS};
use officeloc_geo::project_point;
use officeloc_store::ports::OfficeStore;
use serde_json::Value;

use crate::coerce::coerce_pair;

/// Finds the office a WGS 84 coordinate belongs to.
///
/// The first office in ascending id order whose valid polygon covers the
/// point, or lies within [`BOUNDARY_TOLERANCE_METERS`] of it, wins.
#[derive(Clone)]
pub struct LocationResolver {
    offices: Arc<dyn OfficeStore>,
}

impl LocationResolver {
    pub fn new(offices: Arc<dyn OfficeStore>) -> Self {
        Self { offices }
    }

    /// Resolve a coordinate to a location name, or "Outside Office"
    pub async fn resolve(&self, latitude: f64, longitude: f64) -> LocationResult {
        let matched = self.find_office(latitude, longitude).await;
        LocationResult::new(matched.as_ref(), latitude, longitude)
    }

    /// Resolve loosely typed input; malformed values count as `0.0`
    pub async fn resolve_value(&self, latitude: &Value, longitude: &Value) -> LocationResult {
        let (latitude, longitude) = coerce_pair(latitude, longitude);
        self.resolve(latitude, longitude).await
    }

    /// The matching office, if any. Failures are logged and count as no match.
    pub async fn find_office(&self, latitude: f64, longitude: f64) -> Option<OfficeMatch> {
        let point = match project_point(latitude, longitude) {
            Ok(point) => point,
            Err(e) => {
                tracing::warn!(latitude, longitude, error = %e, "Cannot project coordinate");
                return None;
            }
        };

        match self.offices.locate(&point, BOUNDARY_TOLERANCE_METERS).await {
            Ok(matched) => {
                tracing::debug!(
                    latitude,
                    longitude,
                    office_id = ?matched.as_ref().map(|m| m.id),
                    "Resolved coordinate"
                );
                matched
            }
            Err(e) => {
                tracing::warn!(latitude, longitude, error = %e, "Office lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GeometryStore, NewOffice};
    use async_trait::async_trait;
    use geo::{polygon, Coord, Point};
    use officeloc_core::error::{OfficelocError, Result};
    use officeloc_core::models::{Office, OfficeId, Srid, OUTSIDE_OFFICE};
    use officeloc_geo::transform::{lonlat_to_mercator, mercator_to_lonlat};
    use officeloc_geo::wkt::format_polygon_exact;
    use officeloc_store::ports::GeometryUpdate;
    use officeloc_store::MemoryStore;
    use proptest::prelude::*;
    use serde_json::json;

    fn origin() -> Coord<f64> {
        lonlat_to_mercator(106.816, -6.2).unwrap()
    }

    /// Web Mercator WKT of a square with the given half-width around `center`
    fn square_wkt(center: Coord<f64>, half: f64) -> String {
        let square = polygon![
            (x: center.x - half, y: center.y - half),
            (x: center.x + half, y: center.y - half),
            (x: center.x + half, y: center.y + half),
            (x: center.x - half, y: center.y + half),
        ];
        format_polygon_exact(&square)
    }

    /// `(latitude, longitude)` of the point `dx`, `dy` meters from the origin
    fn lat_lon_at(dx: f64, dy: f64) -> (f64, f64) {
        let o = origin();
        let c = mercator_to_lonlat(o.x + dx, o.y + dy).unwrap();
        (c.y, c.x)
    }

    async fn setup(offices: &[(&str, Option<String>)]) -> LocationResolver {
        let store: Arc<dyn OfficeStore> = Arc::new(MemoryStore::new());
        let geometry = GeometryStore::new(store.clone());
        for (name, wkt) in offices {
            geometry
                .create_office(NewOffice {
                    name: name.to_string(),
                    wkt: wkt.clone(),
                    srid: Some(Srid::WebMercator),
                })
                .await
                .unwrap();
        }
        LocationResolver::new(store)
    }

    #[tokio::test]
    async fn test_square_scenario() {
        let resolver = setup(&[("A", Some(square_wkt(origin(), 50.0)))]).await;

        let (lat, lon) = lat_lon_at(0.0, 0.0);
        assert_eq!(resolver.resolve(lat, lon).await.location, "A");

        let (lat, lon) = lat_lon_at(200.0, 0.0);
        assert_eq!(resolver.resolve(lat, lon).await.location, OUTSIDE_OFFICE);

        let (lat, lon) = lat_lon_at(53.0, 0.0);
        assert_eq!(resolver.resolve(lat, lon).await.location, "A");

        let (lat, lon) = lat_lon_at(0.0, -56.0);
        assert_eq!(resolver.resolve(lat, lon).await.location, OUTSIDE_OFFICE);
    }

    #[tokio::test]
    async fn test_point_on_edge_matches() {
        let resolver = setup(&[("A", Some(square_wkt(origin(), 50.0)))]).await;
        let (lat, lon) = lat_lon_at(50.0, 10.0);
        assert_eq!(resolver.resolve(lat, lon).await.location, "A");
    }

    #[tokio::test]
    async fn test_overlap_lowest_id_wins() {
        let o = origin();
        let shifted = Coord { x: o.x + 40.0, y: o.y };
        let resolver = setup(&[
            ("Low", Some(square_wkt(o, 50.0))),
            ("High", Some(square_wkt(shifted, 50.0))),
        ])
        .await;

        let (lat, lon) = lat_lon_at(20.0, 0.0);
        let result = resolver.resolve(lat, lon).await;
        assert_eq!(result.location, "Low");

        let (lat, lon) = lat_lon_at(80.0, 0.0);
        assert_eq!(resolver.resolve(lat, lon).await.location, "High");
    }

    #[tokio::test]
    async fn test_offices_without_polygon_never_match() {
        let resolver = setup(&[("Empty", None), ("A", Some(square_wkt(origin(), 50.0)))]).await;
        let (lat, lon) = lat_lon_at(0.0, 0.0);
        let matched = resolver.find_office(lat, lon).await.unwrap();
        assert_eq!(matched.id, OfficeId(2));
    }

    #[tokio::test]
    async fn test_result_echoes_input_in_lat_lon_order() {
        let resolver = setup(&[]).await;
        let result = resolver.resolve(-6.2, 106.816).await;
        assert_eq!(result.latitude, -6.2);
        assert_eq!(result.longitude, 106.816);
        assert!(result.is_outside());
    }

    #[tokio::test]
    async fn test_malformed_input_is_zero() {
        let resolver = setup(&[("A", Some(square_wkt(origin(), 50.0)))]).await;
        let result = resolver.resolve_value(&json!("not a number"), &json!(null)).await;
        assert_eq!(result.location, OUTSIDE_OFFICE);
        assert_eq!((result.latitude, result.longitude), (0.0, 0.0));

        let (lat, lon) = lat_lon_at(0.0, 0.0);
        let result = resolver.resolve_value(&json!(lat.to_string()), &json!(lon)).await;
        assert_eq!(result.location, "A");
    }

    #[tokio::test]
    async fn test_unprojectable_point_is_outside() {
        let resolver = setup(&[("A", Some(square_wkt(origin(), 50.0)))]).await;
        assert!(resolver.resolve(90.0, 0.0).await.is_outside());
    }

    struct BrokenStore;

    #[async_trait]
    impl OfficeStore for BrokenStore {
        async fn create_office(&self, _name: &str) -> Result<Office> {
            Err(OfficelocError::Storage("offline".into()))
        }
        async fn get_office(&self, _id: OfficeId) -> Result<Option<Office>> {
            Err(OfficelocError::Storage("offline".into()))
        }
        async fn list_offices(&self) -> Result<Vec<Office>> {
            Err(OfficelocError::Storage("offline".into()))
        }
        async fn rename_office(&self, _id: OfficeId, _name: &str) -> Result<Office> {
            Err(OfficelocError::Storage("offline".into()))
        }
        async fn delete_office(&self, _id: OfficeId) -> Result<()> {
            Err(OfficelocError::Storage("offline".into()))
        }
        async fn replace_geometry(&self, _id: OfficeId, _update: GeometryUpdate) -> Result<Office> {
            Err(OfficelocError::SpatialEngineUnavailable { reason: "no postgis".into() })
        }
        async fn locate(&self, _point: &Point<f64>, _tolerance: f64) -> Result<Option<OfficeMatch>> {
            Err(OfficelocError::SpatialEngineUnavailable { reason: "no postgis".into() })
        }
    }

    #[tokio::test]
    async fn test_engine_failures_fall_back() {
        let store: Arc<dyn OfficeStore> = Arc::new(BrokenStore);

        let resolver = LocationResolver::new(store.clone());
        assert!(resolver.resolve(-6.2, 106.816).await.is_outside());

        let geometry = GeometryStore::new(store);
        let info = geometry.compute_info(OfficeId(1)).await.unwrap();
        assert_eq!(info.as_tuple(), (false, 0.0, 0.0, 0.0));
        assert!(geometry.get_geometry(OfficeId(1)).await.unwrap().is_none());

        let outcome = geometry.set_geometry(OfficeId(1), "POLYGON((0 0, 1 0, 1 1, 0 0))", Srid::Wgs84);
        assert!(matches!(outcome.await.unwrap(), crate::GeometryOutcome::Skipped { .. }));
    }

    proptest! {
        #[test]
        fn prop_strictly_inside_resolves(dx in -45.0f64..45.0, dy in -45.0f64..45.0) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let location = runtime.block_on(async {
                let resolver = setup(&[("A", Some(square_wkt(origin(), 50.0)))]).await;
                let (lat, lon) = lat_lon_at(dx, dy);
                resolver.resolve(lat, lon).await.location
            });
            prop_assert_eq!(location, "A");
        }
    }
}
