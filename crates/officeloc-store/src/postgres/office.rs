use async_trait::async_trait;
use geo::Point;
use officeloc_core::error::{OfficelocError, Result};
use officeloc_core::models::{GeometryInfo, Office, OfficeId, OfficeMatch, Srid};
use officeloc_geo::wkt::{format_polygon_exact, parse_polygon};
use sqlx::postgres::PgRow;
use sqlx::Row;

use super::{bigint, db_error, unsigned, PostgresStore};
use crate::ports::{GeometryUpdate, OfficeStore};

const OFFICE_COLUMNS: &str = "id, name, raw_wkt, source_srid, ST_AsText(geometry) AS geometry_wkt, \
     is_valid, area_m2, centroid_lat, centroid_lon";

fn office_from_row(row: &PgRow) -> Result<Office> {
    let decode = db_error("Failed to decode office row");

    let id: i64 = row.try_get("id").map_err(&decode)?;
    let srid: i32 = row.try_get("source_srid").map_err(&decode)?;
    let geometry_wkt: Option<String> = row.try_get("geometry_wkt").map_err(&decode)?;

    Ok(Office {
        id: OfficeId(unsigned(id, "office_locations.id")?),
        name: row.try_get("name").map_err(&decode)?,
        raw_wkt: row.try_get("raw_wkt").map_err(&decode)?,
        source_srid: Srid::from_epsg(u32::try_from(srid).map_err(|_| {
            OfficelocError::Storage(format!("office_locations.source_srid {} is negative", srid))
        })?)?,
        geometry: geometry_wkt.as_deref().map(parse_polygon).transpose()?,
        info: GeometryInfo {
            is_valid: row.try_get("is_valid").map_err(&decode)?,
            area_m2: row.try_get("area_m2").map_err(&decode)?,
            centroid_lat: row.try_get("centroid_lat").map_err(&decode)?,
            centroid_lon: row.try_get("centroid_lon").map_err(&decode)?,
        },
    })
}

#[async_trait]
impl OfficeStore for PostgresStore {
    async fn create_office(&self, name: &str) -> Result<Office> {
        let id: i64 = sqlx::query_scalar("INSERT INTO office_locations (name) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to create office"))?;

        Ok(Office::new(OfficeId(unsigned(id, "office_locations.id")?), name))
    }

    async fn get_office(&self, id: OfficeId) -> Result<Option<Office>> {
        let row = sqlx::query(&format!("SELECT {} FROM office_locations WHERE id = $1", OFFICE_COLUMNS))
            .bind(bigint(id.0, "office_locations.id")?)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to get office"))?;

        row.as_ref().map(office_from_row).transpose()
    }

    async fn list_offices(&self) -> Result<Vec<Office>> {
        let rows = sqlx::query(&format!("SELECT {} FROM office_locations ORDER BY id", OFFICE_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list offices"))?;

        rows.iter().map(office_from_row).collect()
    }

    async fn rename_office(&self, id: OfficeId, name: &str) -> Result<Office> {
        let row = sqlx::query(&format!(
            "UPDATE office_locations SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            OFFICE_COLUMNS
        ))
        .bind(bigint(id.0, "office_locations.id")?)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to rename office"))?;

        match row {
            Some(row) => office_from_row(&row),
            None => Err(OfficelocError::OfficeNotFound { id }),
        }
    }

    async fn delete_office(&self, id: OfficeId) -> Result<()> {
        // attendances.*_office_id are ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM office_locations WHERE id = $1")
            .bind(bigint(id.0, "office_locations.id")?)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete office"))?;

        if result.rows_affected() == 0 {
            return Err(OfficelocError::OfficeNotFound { id });
        }
        Ok(())
    }

    async fn replace_geometry(&self, id: OfficeId, update: GeometryUpdate) -> Result<Office> {
        self.ensure_spatial_engine().await?;

        let geometry_wkt = update.geometry.as_ref().map(format_polygon_exact);

        let mut tx = self.pool.begin().await.map_err(db_error("Failed to begin transaction"))?;

        let row = sqlx::query(&format!(
            r#"
            UPDATE office_locations
            SET raw_wkt = $2,
                source_srid = $3,
                geometry = ST_GeomFromText($4, 3857),
                is_valid = $5,
                area_m2 = $6,
                centroid_lat = $7,
                centroid_lon = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            OFFICE_COLUMNS
        ))
        .bind(bigint(id.0, "office_locations.id")?)
        .bind(update.raw_wkt.as_deref())
        .bind(i32::from(update.source_srid))
        .bind(geometry_wkt)
        .bind(update.info.is_valid)
        .bind(update.info.area_m2)
        .bind(update.info.centroid_lat)
        .bind(update.info.centroid_lon)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to replace office geometry"))?;

        let Some(row) = row else {
            return Err(OfficelocError::OfficeNotFound { id });
        };
        let office = office_from_row(&row)?;

        tx.commit().await.map_err(db_error("Failed to commit geometry update"))?;
        Ok(office)
    }

    async fn locate(&self, point: &Point<f64>, tolerance: f64) -> Result<Option<OfficeMatch>> {
        self.ensure_spatial_engine().await?;

        let row = sqlx::query(
            r#"
            SELECT id, name
            FROM office_locations
            WHERE geometry IS NOT NULL
              AND is_valid
              AND (ST_Covers(geometry, ST_SetSRID(ST_MakePoint($1, $2), 3857))
                   OR ST_DWithin(geometry, ST_SetSRID(ST_MakePoint($1, $2), 3857), $3))
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(point.x())
        .bind(point.y())
        .bind(tolerance)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to locate office"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let decode = db_error("Failed to decode office match");
        let id: i64 = row.try_get("id").map_err(&decode)?;
        Ok(Some(OfficeMatch {
            id: OfficeId(unsigned(id, "office_locations.id")?),
            name: row.try_get("name").map_err(&decode)?,
        }))
    }
}
