use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Location query
        .route("/attendance_ctrl/get_name", post(handlers::resolve_location))
        .route("/api/v1/locations/resolve", post(handlers::resolve_location))
        .route("/api/v1/distance", post(handlers::measure_distance))

        // Offices
        .route("/api/v1/offices", get(handlers::list_offices).post(handlers::create_office))
        .route(
            "/api/v1/offices/{id}",
            get(handlers::get_office)
                .patch(handlers::update_office)
                .delete(handlers::delete_office),
        )
        .route(
            "/api/v1/offices/{id}/geometry",
            get(handlers::get_office_geometry).put(handlers::set_office_geometry),
        )

        // Attendances
        .route(
            "/api/v1/attendances",
            get(handlers::list_attendances).post(handlers::create_attendance),
        )
        .route(
            "/api/v1/attendances/{id}",
            get(handlers::get_attendance).patch(handlers::update_attendance),
        )

        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
