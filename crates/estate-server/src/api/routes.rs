//! REST API routes.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api::{estates, request_id};
use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    let estate_routes = Router::new()
        .route("/estate", post(estates::create_estate))
        .route("/estate/:id/tree", post(estates::create_tree))
        .route("/estate/:id/stats", get(estates::get_stats))
        .route("/estate/:id/drone-plan", get(estates::get_drone_plan))
        .route("/estate/:id/route", get(estates::get_route));

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(estate_routes)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::ensure_request_id))
}
