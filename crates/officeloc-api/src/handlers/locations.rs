use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use officeloc_core::models::LocationResult;
use serde_json::Value;

use crate::dto::LocationRequest;
use crate::state::AppState;

/// Resolve a coordinate to an office name or "Outside Office".
///
/// Never fails: a body that cannot be read is resolved as `(0.0, 0.0)`.
pub async fn resolve_location(
    State(state): State<Arc<AppState>>,
    request: Result<Json<LocationRequest>, JsonRejection>,
) -> Json<LocationResult> {
    let (latitude, longitude) = match request {
        Ok(Json(request)) => (request.latitude, request.longitude),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable location request, using 0.0");
            (Value::Null, Value::Null)
        }
    };

    let result = state.resolver.resolve_value(&latitude, &longitude).await;

    tracing::info!(
        latitude = result.latitude,
        longitude = result.longitude,
        location = %result.location,
        "Resolved location"
    );

    Json(result)
}
