use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use officeloc_core::models::{AttendanceEvent, AttendanceId, AttendancePatch, NewAttendance};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn create_attendance(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewAttendance>,
) -> Result<(StatusCode, Json<AttendanceEvent>), ApiError> {
    let event = state.attendance.record(request).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn list_attendances(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AttendanceEvent>>, ApiError> {
    Ok(Json(state.attendance.list().await?))
}

pub async fn get_attendance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<AttendanceEvent>, ApiError> {
    Ok(Json(state.attendance.get(AttendanceId(id)).await?))
}

pub async fn update_attendance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(patch): Json<AttendancePatch>,
) -> Result<Json<AttendanceEvent>, ApiError> {
    tracing::info!(attendance_id = id, "Updating attendance");
    Ok(Json(state.attendance.update(AttendanceId(id), patch).await?))
}
