use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use officeloc_core::models::OfficeId;
use officeloc_geo::wkt::{format_polygon, EDITOR_PRECISION};
use officeloc_resolver::{GeometryOutcome, NewOffice, OfficeUpdate};

use crate::dto::{
    CreateOfficeRequest, GeometryResponse, GeometryWriteResponse, OfficeResponse,
    SetGeometryRequest, UpdateOfficeRequest,
};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_offices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<OfficeResponse>>, ApiError> {
    let offices = state.geometry.list_offices().await?;
    Ok(Json(offices.into_iter().map(OfficeResponse::from).collect()))
}

pub async fn create_office(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateOfficeRequest>,
) -> Result<(StatusCode, Json<OfficeResponse>), ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::bad_request("Office name must not be empty"));
    }

    let office = state
        .geometry
        .create_office(NewOffice { name: request.name, wkt: request.wkt, srid: request.srid })
        .await?;

    Ok((StatusCode::CREATED, Json(office.into())))
}

pub async fn get_office(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<OfficeResponse>, ApiError> {
    let office = state.geometry.get_office(OfficeId(id)).await?;
    Ok(Json(office.into()))
}

pub async fn update_office(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(request): Json<UpdateOfficeRequest>,
) -> Result<Json<OfficeResponse>, ApiError> {
    if request.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(ApiError::bad_request("Office name must not be empty"));
    }

    let update = OfficeUpdate { name: request.name, wkt: request.wkt, srid: request.srid };
    let office = state.geometry.update_office(OfficeId(id), update).await?;
    Ok(Json(office.into()))
}

pub async fn delete_office(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    tracing::info!(office_id = id, "Deleting office");
    state.geometry.delete_office(OfficeId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Stored polygon in WGS 84 for the map editor to pre-render
pub async fn get_office_geometry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<GeometryResponse>, ApiError> {
    let polygon = state.geometry.get_geometry_wgs84(OfficeId(id)).await?;

    let response = match polygon {
        Some(polygon) => GeometryResponse {
            office_id: id,
            wkt: Some(format_polygon(&polygon, EDITOR_PRECISION)),
            geojson: Some(geojson::Geometry::new(geojson::Value::from(&polygon))),
        },
        None => GeometryResponse { office_id: id, wkt: None, geojson: None },
    };

    Ok(Json(response))
}

pub async fn set_office_geometry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(request): Json<SetGeometryRequest>,
) -> Result<Json<GeometryWriteResponse>, ApiError> {
    let id = OfficeId(id);
    let srid = request.srid.unwrap_or_else(|| state.geometry.default_srid());

    let (outcome, reason) = match state.geometry.set_geometry(id, &request.wkt, srid).await? {
        GeometryOutcome::Applied(_) => ("applied", None),
        GeometryOutcome::Cleared => ("cleared", None),
        GeometryOutcome::Skipped { reason } => ("skipped", Some(reason)),
    };

    let office = state.geometry.get_office(id).await?;
    Ok(Json(GeometryWriteResponse { outcome, reason, office: office.into() }))
}
