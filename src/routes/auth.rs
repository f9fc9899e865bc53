use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Auth Router Module
///
/// The login and signup pages, plus the session actions under `/api/session`.
///
/// The pages are classified as auth pages by the route guard, so a browser that
/// already holds a token never sees them. The session actions live under `/api`
/// and are skipped by the guard entirely.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        // GET /login
        .route("/login", get(handlers::login_page))
        // GET /signup
        .route("/signup", get(handlers::signup_page))
        // POST /api/session logs in, DELETE /api/session logs out.
        // Both write cookies only through `session::establish` / `session::clear`.
        .route(
            "/api/session",
            axum::routing::post(handlers::login).delete(handlers::logout),
        )
}
