use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Backend access, session handling and the route guard.
pub mod backend;
pub mod config;
pub mod error;
pub mod fetch;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod session;

// Route tables, grouped by how the route guard treats them.
pub mod routes;
use routes::{auth, protected, public};

// --- Public Re-exports ---

// The types main.rs and the integration tests assemble the app from.

pub use backend::{BackendState, ConsoleBackend, HttpBackend};
pub use config::AppConfig;
pub use fetch::{FetchOptions, TokenClient};
pub use guard::{GuardDecision, RouteClass, RouteRules, RouteRulesState};
pub use session::Session;

/// ApiDoc
///
/// OpenAPI description of the console's own HTTP surface, served at
/// `/api-docs/openapi.json` with Swagger UI at `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    // Every console handler carrying a `#[utoipa::path]` attribute.
    paths(
        handlers::login_page, handlers::signup_page, handlers::login, handlers::logout,
        handlers::dashboard, handlers::categories, handlers::menus, handlers::orders,
        handlers::create_category, handlers::update_order_status
    ),
    // Request and response bodies, shared with the front end through ts-rs.
    components(
        schemas(
            models::LoginRequest, models::TokenPair, models::StoreInfo, models::Category,
            models::CreateCategoryRequest, models::Menu, models::Order, models::OrderItem,
            models::OrderStatus, models::UpdateOrderStatusRequest, models::OrderCard,
            models::TableView, models::OrdersView,
            models::AuthPageView, models::ErrorBody,
        )
    ),
    tags(
        (name = "mallang-console", description = "Mallang Order admin console")
    )
)]
struct ApiDoc;

/// AppState
///
/// Everything a request needs, shared read-only across all requests: the
/// backend client, the loaded configuration and the route guard's rules.
#[derive(Clone)]
pub struct AppState {
    /// Backend API access, real or mocked.
    pub backend: BackendState,
    pub config: AppConfig,
    /// Static path classification for the route guard.
    pub rules: RouteRulesState,
}

impl AppState {
    /// State wired to the real backend described by `config`.
    pub fn from_config(config: AppConfig) -> Self {
        // One pooled HTTP client for every request; the missing-token policy
        // is fixed at startup.
        let client = TokenClient::new(config.missing_token);
        let backend = Arc::new(HttpBackend::new(config.api_url.clone(), client)) as BackendState;
        Self {
            backend,
            config,
            rules: Arc::new(RouteRules::default()),
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

// Handlers and the guard pull only the piece of AppState they need.

impl FromRef<AppState> for BackendState {
    fn from_ref(app_state: &AppState) -> BackendState {
        app_state.backend.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for RouteRulesState {
    fn from_ref(app_state: &AppState) -> RouteRulesState {
        app_state.rules.clone()
    }
}

/// create_router
///
/// Assembles the console's routes, puts the route guard in front of all of
/// them and adds the observability layers.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    // Origins, methods and headers are not restricted.
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name used for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Swagger UI over the generated OpenAPI document.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Health check.
        .merge(public::public_routes())
        // Login/signup pages and the session actions.
        .merge(auth::auth_routes())
        // Store owner pages and data actions.
        .merge(protected::protected_routes())
        // The guard wraps every route and classifies the path itself, the same
        // way an edge middleware with a path matcher would.
        .layer(middleware::from_fn_with_state(
            state.rules.clone(),
            guard::route_guard,
        ))
        // Shared state for every route.
        .with_state(state);

    // 3. Observability and Correlation Layers (outermost, run first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a UUID for every incoming request.
                .layer(SetRequestIdLayer::new(
                    x_request_id.clone(),
                    MakeRequestUuid,
                ))
                // 3b. Request Tracing: one span per request, tagged with its ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: echo x-request-id back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the per-request span: method, uri and the `x-request-id` set above,
/// so every log line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
