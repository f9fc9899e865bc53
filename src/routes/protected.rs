use crate::{AppState, handlers};
use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};

/// Protected Router Module
///
/// The store owner's pages and the actions behind them. Navigation to any page
/// here without an `accessToken` cookie is redirected to `/login` by the route
/// guard before a handler runs.
///
/// The `/api/*` actions are not guarded (the guard skips `/api`); a missing
/// token there is forwarded to the backend, which rejects the call.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // The console has no landing page of its own.
        .route("/", get(|| async { Redirect::temporary("/dashboard") }))
        // GET /dashboard
        // Store profile from /api/admin/store-info.
        .route("/dashboard", get(handlers::dashboard))
        // GET /categories
        .route("/categories", get(handlers::categories))
        // GET /menus?category=...
        .route("/menus", get(handlers::menus))
        // GET /orders
        // Live per-table view with the next status offered for each order.
        .route("/orders", get(handlers::orders))
        // POST /api/categories
        .route("/api/categories", post(handlers::create_category))
        // PUT /api/orders/{id}/status
        // Forward-only: pending -> preparing -> completed.
        .route(
            "/api/orders/{id}/status",
            put(handlers::update_order_status),
        )
}
