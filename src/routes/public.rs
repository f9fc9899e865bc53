use crate::AppState;
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints that sit outside both guard lists and are always allowed through.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers. Does not touch the backend.
        .route("/health", get(|| async { "ok" }))
}
