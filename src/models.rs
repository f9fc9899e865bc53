use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

// --- Authentication ---

/// LoginRequest
///
/// Credentials posted to the backend `/login` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Client-side form rules: both fields present, email shaped like one.
    pub fn validate(&self) -> Result<(), String> {
        if self.email.trim().is_empty() {
            return Err("Email is required".to_string());
        }
        if !self.email.contains('@') {
            return Err("Invalid email address".to_string());
        }
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        Ok(())
    }
}

/// TokenPair
///
/// What a successful login returns. Both values are opaque strings.
#[derive(Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair").finish_non_exhaustive()
    }
}

// --- Store ---

/// StoreInfo
///
/// The store profile shown on the dashboard. Every field is optional because
/// the backend omits what the owner has not filled in yet.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StoreInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_count: Option<u32>,
}

// --- Categories ---

/// Category
///
/// A menu category as listed by `/api/admin/categories`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
    #[serde(default)]
    pub category_name_en: String,
    #[serde(default)]
    pub admin_id: i64,
    #[serde(default)]
    #[ts(type = "Array<unknown>")]
    #[schema(value_type = Vec<Object>)]
    pub menus: Vec<serde_json::Value>,
}

/// CreateCategoryRequest
///
/// Input payload for adding a category (POST /api/categories).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateCategoryRequest {
    pub category_name: String,
    #[serde(default)]
    pub category_name_en: String,
}

impl CreateCategoryRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.category_name.trim().is_empty() {
            return Err("Category name is required".to_string());
        }
        Ok(())
    }
}

// --- Menus ---

/// Menu
///
/// A single orderable item belonging to one category.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Menu {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// MenuFilter
///
/// Query parameters for the menus page. `all` (or no value) disables filtering.
#[derive(Debug, Clone, Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MenuFilter {
    pub category: Option<String>,
}

impl MenuFilter {
    /// The category to filter on, if any.
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|category| !category.is_empty() && *category != "all")
    }
}

// --- Orders ---

/// OrderStatus
///
/// Live per-table order state. Orders only move forward.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Completed,
}

impl OrderStatus {
    /// The status the console offers as the next step, if any.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Completed),
            OrderStatus::Completed => None,
        }
    }

    /// Wire name, as the backend spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[ts(export)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    pub price: i64,
}

/// Order
///
/// One table's order as returned by `/api/admin/orders`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub table_number: u32,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub total_amount: i64,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// UpdateOrderStatusRequest
///
/// Body of PUT /api/orders/{id}/status, forwarded verbatim to the backend.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// Tables a store has when nothing says otherwise. The floor view always
/// shows at least this many.
pub const DEFAULT_TABLE_COUNT: u32 = 16;

/// OrderCard
///
/// One order as the orders page shows it, with the single status change the
/// console offers for it. `next_status` is absent once an order is completed.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderCard {
    pub order: Order,
    pub next_status: Option<OrderStatus>,
}

impl From<Order> for OrderCard {
    fn from(order: Order) -> Self {
        let next_status = order.status.next();
        Self { order, next_status }
    }
}

/// TableView
///
/// A single table on the floor. A table is occupied while any of its orders
/// is not yet completed.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TableView {
    pub table_number: u32,
    pub occupied: bool,
    pub orders: Vec<OrderCard>,
}

/// OrdersView
///
/// The orders page: every table from 1 up with its orders, plus the flat
/// active/completed split used by the list layout.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct OrdersView {
    pub tables: Vec<TableView>,
    pub active: Vec<Order>,
    pub completed: Vec<Order>,
}

impl OrdersView {
    /// Builds the view for tables `1..=table_count`. Orders placed at a table
    /// beyond that range widen it rather than disappear.
    pub fn from_orders(orders: Vec<Order>, table_count: u32) -> Self {
        let last_table = orders
            .iter()
            .map(|order| order.table_number)
            .max()
            .unwrap_or(0)
            .max(table_count);

        let tables = (1..=last_table)
            .map(|table_number| {
                let orders: Vec<OrderCard> = orders
                    .iter()
                    .filter(|order| order.table_number == table_number)
                    .cloned()
                    .map(OrderCard::from)
                    .collect();
                TableView {
                    table_number,
                    occupied: orders
                        .iter()
                        .any(|card| card.order.status != OrderStatus::Completed),
                    orders,
                }
            })
            .collect();

        let (completed, active): (Vec<Order>, Vec<Order>) = orders
            .into_iter()
            .partition(|order| order.status == OrderStatus::Completed);
        Self {
            tables,
            active,
            completed,
        }
    }
}

// --- Pages ---

/// AuthPageView
///
/// Descriptor returned for the login and signup pages; rendering is left to
/// whatever front end consumes the console.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AuthPageView {
    pub page: String,
    pub submit_to: String,
}

/// ErrorBody
///
/// JSON body of every error the console produces itself.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ErrorBody {
    pub error: String,
}
