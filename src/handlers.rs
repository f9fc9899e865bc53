use crate::{
    backend::BackendState,
    config::AppConfig,
    error::ConsoleError,
    models::{
        AuthPageView, Category, CreateCategoryRequest, DEFAULT_TABLE_COUNT, LoginRequest, Menu,
        MenuFilter, OrdersView, StoreInfo, UpdateOrderStatusRequest,
    },
    session::{self, Session},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
};
use axum_extra::extract::cookie::CookieJar;

// --- Auth Pages ---

/// login_page
///
/// [Auth Page] Describes the login form. Only reachable without a session; the
/// route guard bounces signed-in users to the dashboard.
#[utoipa::path(
    get,
    path = "/login",
    responses((status = 200, description = "Login page", body = AuthPageView))
)]
pub async fn login_page() -> Json<AuthPageView> {
    Json(AuthPageView {
        page: "login".to_string(),
        submit_to: "/api/session".to_string(),
    })
}

/// signup_page
///
/// [Auth Page] Describes the signup form.
#[utoipa::path(
    get,
    path = "/signup",
    responses((status = 200, description = "Signup page", body = AuthPageView))
)]
pub async fn signup_page() -> Json<AuthPageView> {
    Json(AuthPageView {
        page: "signup".to_string(),
        submit_to: "/login".to_string(),
    })
}

// --- Session Actions ---

/// login
///
/// [Action] Validates the login form, exchanges the credentials with the
/// backend and writes the session cookies through the single write path.
/// Redirects to the dashboard on success; relays the backend's status on
/// rejection.
#[utoipa::path(
    post,
    path = "/api/session",
    request_body = LoginRequest,
    responses(
        (status = 303, description = "Logged in, redirect to /dashboard"),
        (status = 422, description = "Form validation failed", body = crate::models::ErrorBody)
    )
)]
pub async fn login(
    State(backend): State<BackendState>,
    State(config): State<AppConfig>,
    jar: CookieJar,
    Json(credentials): Json<LoginRequest>,
) -> Result<(CookieJar, Redirect), ConsoleError> {
    credentials.validate().map_err(ConsoleError::Validation)?;

    let tokens = backend.login(&credentials).await?;
    tracing::info!("session established");

    let jar = session::establish(jar, &tokens, config.cookie_secure);
    Ok((jar, Redirect::to("/dashboard")))
}

/// logout
///
/// [Action] Expires both session cookies and sends the browser to the login page.
/// The backend is not told; it holds no session of its own.
#[utoipa::path(
    delete,
    path = "/api/session",
    responses((status = 303, description = "Logged out, redirect to /login"))
)]
pub async fn logout(State(config): State<AppConfig>, jar: CookieJar) -> (CookieJar, Redirect) {
    tracing::info!("session cleared");
    (session::clear(jar, config.cookie_secure), Redirect::to("/login"))
}

// --- Protected Pages ---

/// dashboard
///
/// [Protected Page] The store profile.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses((status = 200, description = "Store info", body = StoreInfo))
)]
pub async fn dashboard(
    session: Session,
    State(backend): State<BackendState>,
) -> Result<Json<StoreInfo>, ConsoleError> {
    Ok(Json(backend.store_info(&session).await?))
}

/// categories
///
/// [Protected Page] All categories owned by the signed-in admin.
#[utoipa::path(
    get,
    path = "/categories",
    responses((status = 200, description = "Categories", body = [Category]))
)]
pub async fn categories(
    session: Session,
    State(backend): State<BackendState>,
) -> Result<Json<Vec<Category>>, ConsoleError> {
    Ok(Json(backend.list_categories(&session).await?))
}

/// menus
///
/// [Protected Page] Menu items, optionally narrowed to one category.
#[utoipa::path(
    get,
    path = "/menus",
    params(MenuFilter),
    responses((status = 200, description = "Menus", body = [Menu]))
)]
pub async fn menus(
    session: Session,
    State(backend): State<BackendState>,
    Query(filter): Query<MenuFilter>,
) -> Result<Json<Vec<Menu>>, ConsoleError> {
    let mut menus = backend.list_menus(&session).await?;
    if let Some(category) = filter.category() {
        menus.retain(|menu| menu.category_id == category);
    }
    Ok(Json(menus))
}

/// orders
///
/// [Protected Page] Live per-table order status: every table with its orders,
/// whether it is occupied, and the next status each order can move to.
#[utoipa::path(
    get,
    path = "/orders",
    responses((status = 200, description = "Orders", body = OrdersView))
)]
pub async fn orders(
    session: Session,
    State(backend): State<BackendState>,
) -> Result<Json<OrdersView>, ConsoleError> {
    let orders = backend.list_orders(&session).await?;
    Ok(Json(OrdersView::from_orders(orders, DEFAULT_TABLE_COUNT)))
}

// --- Data Actions ---

/// create_category
///
/// [Action] Adds a category. The caller refreshes the categories page afterwards.
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created"),
        (status = 422, description = "Form validation failed", body = crate::models::ErrorBody)
    )
)]
pub async fn create_category(
    session: Session,
    State(backend): State<BackendState>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<StatusCode, ConsoleError> {
    request.validate().map_err(ConsoleError::Validation)?;
    backend.create_category(&session, &request).await?;
    Ok(StatusCode::CREATED)
}

/// update_order_status
///
/// [Action] Moves an order one step forward: pending to preparing, preparing to
/// completed. The order's current status is read from the backend first; any
/// other transition is refused before the backend is asked to change anything.
#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    params(("id" = String, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 204, description = "Status updated"),
        (status = 404, description = "No such order", body = crate::models::ErrorBody),
        (status = 422, description = "Not the next status for this order", body = crate::models::ErrorBody)
    )
)]
pub async fn update_order_status(
    session: Session,
    State(backend): State<BackendState>,
    Path(order_id): Path<String>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<StatusCode, ConsoleError> {
    validate_order_id(&order_id).map_err(ConsoleError::Validation)?;

    let current = backend
        .list_orders(&session)
        .await?
        .into_iter()
        .find(|order| order.id == order_id)
        .map(|order| order.status)
        .ok_or_else(|| ConsoleError::OrderNotFound(order_id.clone()))?;

    if current.next() != Some(request.status) {
        return Err(ConsoleError::Validation(format!(
            "Order cannot move from {} to {}",
            current.as_str(),
            request.status.as_str()
        )));
    }

    backend
        .update_order_status(&session, &order_id, request.status)
        .await?;
    tracing::info!(order_id = %order_id, status = request.status.as_str(), "order status updated");
    Ok(StatusCode::NO_CONTENT)
}

/// Order ids are opaque, but must stay one path segment on the backend side.
fn validate_order_id(order_id: &str) -> Result<(), String> {
    let malformed = matches!(order_id, "" | "." | "..")
        || order_id.contains(['/', '?', '#']);
    if malformed {
        Err("Invalid order id".to_string())
    } else {
        Ok(())
    }
}
