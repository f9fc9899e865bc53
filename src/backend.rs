use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;

use crate::{
    error::ConsoleError,
    fetch::{FetchError, FetchOptions, TokenClient},
    models::{
        Category, CreateCategoryRequest, LoginRequest, Menu, Order, OrderStatus, StoreInfo,
        TokenPair, UpdateOrderStatusRequest,
    },
    session::Session,
};

/// ConsoleBackend
///
/// The kiosk backend as the console sees it. Handlers only talk to this trait,
/// so tests swap in an in-memory implementation without a network.
///
/// Every call except `login` carries the caller's session.
#[async_trait]
pub trait ConsoleBackend: Send + Sync {
    /// Exchanges credentials for a token pair. Sent without any token.
    async fn login(&self, credentials: &LoginRequest) -> Result<TokenPair, ConsoleError>;

    async fn store_info(&self, session: &Session) -> Result<StoreInfo, ConsoleError>;

    async fn list_categories(&self, session: &Session) -> Result<Vec<Category>, ConsoleError>;
    async fn create_category(
        &self,
        session: &Session,
        request: &CreateCategoryRequest,
    ) -> Result<(), ConsoleError>;

    async fn list_menus(&self, session: &Session) -> Result<Vec<Menu>, ConsoleError>;

    async fn list_orders(&self, session: &Session) -> Result<Vec<Order>, ConsoleError>;
    async fn update_order_status(
        &self,
        session: &Session,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<(), ConsoleError>;
}

/// BackendState
///
/// The shared handle stored in `AppState`.
pub type BackendState = Arc<dyn ConsoleBackend>;

/// HttpBackend
///
/// The real implementation: REST calls against the backend API through the
/// authenticated-fetch helper.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: TokenClient,
    api_url: String,
}

impl HttpBackend {
    pub fn new(api_url: impl Into<String>, client: TokenClient) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Appends `segments` to the API base URL, percent-encoding each one. A
    /// caller-supplied id stays a single path segment whatever it contains.
    fn segments_url(&self, segments: &[&str]) -> Result<String, ConsoleError> {
        let mut url = reqwest::Url::parse(&self.api_url)
            .map_err(|e| ConsoleError::BackendUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ConsoleError::BackendUrl(self.api_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        session: &Session,
    ) -> Result<T, ConsoleError> {
        let response = self
            .client
            .fetch(&self.url(path), session, FetchOptions::new())
            .await?;
        decode(ensure_success(response)?).await
    }

    async fn send(
        &self,
        url: &str,
        session: &Session,
        options: FetchOptions,
    ) -> Result<(), ConsoleError> {
        let response = self.client.fetch(url, session, options).await?;
        ensure_success(response).map(|_| ())
    }
}

/// Turns a non-2xx response into `BackendStatus`, keeping the status code.
fn ensure_success(response: Response) -> Result<Response, ConsoleError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ConsoleError::BackendStatus(status))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ConsoleError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ConsoleError::UnexpectedPayload(e.to_string()))
}

#[async_trait]
impl ConsoleBackend for HttpBackend {
    async fn login(&self, credentials: &LoginRequest) -> Result<TokenPair, ConsoleError> {
        let response = self
            .client
            .http()
            .post(self.url("/login"))
            .json(credentials)
            .send()
            .await
            .map_err(FetchError::Transport)?;
        decode(ensure_success(response)?).await
    }

    async fn store_info(&self, session: &Session) -> Result<StoreInfo, ConsoleError> {
        self.get_json("/api/admin/store-info", session).await
    }

    async fn list_categories(&self, session: &Session) -> Result<Vec<Category>, ConsoleError> {
        let payload: serde_json::Value = self.get_json("/api/admin/categories", session).await?;
        if !payload.is_array() {
            return Err(ConsoleError::UnexpectedPayload(
                "categories response is not an array".to_string(),
            ));
        }
        serde_json::from_value(payload).map_err(|e| ConsoleError::UnexpectedPayload(e.to_string()))
    }

    async fn create_category(
        &self,
        session: &Session,
        request: &CreateCategoryRequest,
    ) -> Result<(), ConsoleError> {
        let options = FetchOptions::new().method(Method::POST).json(request)?;
        self.send(&self.url("/api/category"), session, options).await
    }

    async fn list_menus(&self, session: &Session) -> Result<Vec<Menu>, ConsoleError> {
        self.get_json("/api/admin/menus", session).await
    }

    async fn list_orders(&self, session: &Session) -> Result<Vec<Order>, ConsoleError> {
        self.get_json("/api/admin/orders", session).await
    }

    async fn update_order_status(
        &self,
        session: &Session,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<(), ConsoleError> {
        let options = FetchOptions::new()
            .method(Method::PUT)
            .json(&UpdateOrderStatusRequest { status })?;
        let url = self.segments_url(&["api", "admin", "orders", order_id, "status"])?;
        self.send(&url, session, options).await
    }
}
