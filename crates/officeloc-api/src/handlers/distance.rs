use axum::Json;
use officeloc_geo::haversine_meters;

use crate::dto::{DistanceRequest, DistanceResponse};

pub async fn measure_distance(Json(request): Json<DistanceRequest>) -> Json<DistanceResponse> {
    let meters = haversine_meters(request.lat1, request.lon1, request.lat2, request.lon2);
    Json(DistanceResponse { meters })
}
