use async_trait::async_trait;
use officeloc_core::error::{OfficelocError, Result};
use officeloc_core::models::{
    AttendanceColumns, AttendanceEvent, AttendanceId, NewAttendance, OfficeId,
};
use sqlx::postgres::PgRow;
use sqlx::Row;

use super::{bigint, db_error, unsigned, PostgresStore};
use crate::ports::AttendanceStore;

const ATTENDANCE_COLUMNS: &str = "id, employee_id, check_in, check_out, in_latitude, in_longitude, \
     out_latitude, out_longitude, checkin_office_id, checkout_office_id";

fn attendance_from_row(row: &PgRow) -> Result<AttendanceEvent> {
    let decode = db_error("Failed to decode attendance row");

    let id: i64 = row.try_get("id").map_err(&decode)?;
    let employee_id: i64 = row.try_get("employee_id").map_err(&decode)?;
    let checkin: Option<i64> = row.try_get("checkin_office_id").map_err(&decode)?;
    let checkout: Option<i64> = row.try_get("checkout_office_id").map_err(&decode)?;

    let office = |id: Option<i64>, column: &str| -> Result<Option<OfficeId>> {
        id.map(|id| unsigned(id, column).map(OfficeId)).transpose()
    };

    Ok(AttendanceEvent {
        id: AttendanceId(unsigned(id, "attendances.id")?),
        employee_id: unsigned(employee_id, "attendances.employee_id")?,
        check_in: row.try_get("check_in").map_err(&decode)?,
        check_out: row.try_get("check_out").map_err(&decode)?,
        in_latitude: row.try_get("in_latitude").map_err(&decode)?,
        in_longitude: row.try_get("in_longitude").map_err(&decode)?,
        out_latitude: row.try_get("out_latitude").map_err(&decode)?,
        out_longitude: row.try_get("out_longitude").map_err(&decode)?,
        checkin_office: office(checkin, "attendances.checkin_office_id")?,
        checkout_office: office(checkout, "attendances.checkout_office_id")?,
    })
}

#[async_trait]
impl AttendanceStore for PostgresStore {
    async fn insert_attendance(&self, new: &NewAttendance) -> Result<AttendanceEvent> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO attendances
                (employee_id, check_in, check_out, in_latitude, in_longitude, out_latitude, out_longitude)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            ATTENDANCE_COLUMNS
        ))
        .bind(bigint(new.employee_id, "attendances.employee_id")?)
        .bind(new.check_in)
        .bind(new.check_out)
        .bind(new.in_latitude)
        .bind(new.in_longitude)
        .bind(new.out_latitude)
        .bind(new.out_longitude)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to insert attendance"))?;

        attendance_from_row(&row)
    }

    async fn get_attendance(&self, id: AttendanceId) -> Result<Option<AttendanceEvent>> {
        let row = sqlx::query(&format!("SELECT {} FROM attendances WHERE id = $1", ATTENDANCE_COLUMNS))
            .bind(bigint(id.0, "attendances.id")?)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to get attendance"))?;

        row.as_ref().map(attendance_from_row).transpose()
    }

    async fn save_attendance(&self, event: &AttendanceEvent, columns: AttendanceColumns) -> Result<()> {
        let office = |id: Option<OfficeId>| id.map(|id| bigint(id.0, "office_locations.id")).transpose();

        // One statement, so the row lock covers every group written
        let result = sqlx::query(
            r#"
            UPDATE attendances
            SET check_out = CASE WHEN $2 THEN $3 ELSE check_out END,
                in_latitude = CASE WHEN $4 THEN $5 ELSE in_latitude END,
                in_longitude = CASE WHEN $4 THEN $6 ELSE in_longitude END,
                checkin_office_id = CASE WHEN $4 THEN $7 ELSE checkin_office_id END,
                out_latitude = CASE WHEN $8 THEN $9 ELSE out_latitude END,
                out_longitude = CASE WHEN $8 THEN $10 ELSE out_longitude END,
                checkout_office_id = CASE WHEN $8 THEN $11 ELSE checkout_office_id END
            WHERE id = $1
            "#,
        )
        .bind(bigint(event.id.0, "attendances.id")?)
        .bind(columns.check_out)
        .bind(event.check_out)
        .bind(columns.check_in_pair)
        .bind(event.in_latitude)
        .bind(event.in_longitude)
        .bind(office(event.checkin_office)?)
        .bind(columns.check_out_pair)
        .bind(event.out_latitude)
        .bind(event.out_longitude)
        .bind(office(event.checkout_office)?)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to save attendance"))?;

        if result.rows_affected() == 0 {
            return Err(OfficelocError::AttendanceNotFound { id: event.id });
        }
        Ok(())
    }

    async fn list_attendances(&self) -> Result<Vec<AttendanceEvent>> {
        let rows = sqlx::query(&format!("SELECT {} FROM attendances ORDER BY id", ATTENDANCE_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list attendances"))?;

        rows.iter().map(attendance_from_row).collect()
    }
}
