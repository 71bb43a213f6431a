//! API routes for the estate server.

pub mod estates;
pub mod request_id;
mod routes;

use axum::Router;

pub fn routes() -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router()
}
