use std::collections::BTreeMap;

use reqwest::{
    Method, Response,
    header::{self, HeaderMap, HeaderName, HeaderValue},
};
use serde::Serialize;

use crate::session::Session;

/// The fixed request header carrying the raw access token to the backend.
pub const AUTH_HEADER: &str = "access";

/// Placeholder sent under `MissingTokenPolicy::SendNull` when no token exists.
pub const MISSING_TOKEN_SENTINEL: &str = "null";

/// MissingTokenPolicy
///
/// What the fetch helper does when the session carries no access token.
/// `Omit` leaves the auth header off entirely. `SendNull` sends the literal
/// string `null`, which is what the browser console historically did and what
/// some backend deployments key their "logged out" error on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingTokenPolicy {
    #[default]
    Omit,
    SendNull,
}

impl MissingTokenPolicy {
    /// Parses the `MISSING_TOKEN_POLICY` setting. Anything unrecognised is `Omit`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "null" | "send-null" | "send_null" => MissingTokenPolicy::SendNull,
            _ => MissingTokenPolicy::Omit,
        }
    }
}

/// FetchOptions
///
/// The caller's request descriptor. Everything in here reaches the backend
/// unmodified; the fetch helper only adds to the header set.
#[derive(Clone, Debug, Default)]
pub struct FetchOptions {
    /// Defaults to GET.
    pub method: Option<Method>,
    /// Header name to value. Keys are unique.
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `payload` as the body and declares it as JSON.
    pub fn json<T: Serialize>(self, payload: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_string(payload)?;
        Ok(self.header("Content-Type", "application/json").body(body))
    }
}

/// FetchError
///
/// Only transport-level failures surface here. An HTTP error status is a
/// successful fetch as far as this layer is concerned.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid request header `{0}`")]
    InvalidHeader(String),
    #[error("request to backend failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// outgoing_headers
///
/// Builds the header set sent to the backend: the caller's headers, then the
/// session cookies as credentials, then the auth header. The auth header is
/// written last so it replaces any caller header of the same name.
pub fn outgoing_headers(
    caller: &BTreeMap<String, String>,
    session: &Session,
    missing_token: MissingTokenPolicy,
) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::with_capacity(caller.len() + 2);

    for (name, value) in caller {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| FetchError::InvalidHeader(name.clone()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| FetchError::InvalidHeader(name.clone()))?;
        headers.insert(header_name, header_value);
    }

    // Credentials ride along with whatever cookies the caller already set.
    if let Some(credentials) = session.cookie_header() {
        let merged = match headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
            Some(existing) if !existing.is_empty() => format!("{}; {}", existing, credentials),
            _ => credentials,
        };
        let value = HeaderValue::from_str(&merged)
            .map_err(|_| FetchError::InvalidHeader(header::COOKIE.to_string()))?;
        headers.insert(header::COOKIE, value);
    }

    let token = match (&session.access, missing_token) {
        (Some(token), _) => Some(token.as_str()),
        (None, MissingTokenPolicy::SendNull) => Some(MISSING_TOKEN_SENTINEL),
        (None, MissingTokenPolicy::Omit) => None,
    };
    if let Some(token) = token {
        let value = HeaderValue::from_str(token)
            .map_err(|_| FetchError::InvalidHeader(AUTH_HEADER.to_string()))?;
        headers.insert(HeaderName::from_static(AUTH_HEADER), value);
    }

    Ok(headers)
}

/// TokenClient
///
/// The authenticated-fetch helper. Stateless apart from the pooled reqwest
/// client, so one instance is shared by every request handler. It never writes
/// to the session, never retries, and sets no timeout of its own.
#[derive(Clone, Debug)]
pub struct TokenClient {
    http: reqwest::Client,
    missing_token: MissingTokenPolicy,
}

impl TokenClient {
    pub fn new(missing_token: MissingTokenPolicy) -> Self {
        Self::with_client(reqwest::Client::new(), missing_token)
    }

    pub fn with_client(http: reqwest::Client, missing_token: MissingTokenPolicy) -> Self {
        Self {
            http,
            missing_token,
        }
    }

    /// The underlying client, for calls that must not carry a token (login).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// fetch
    ///
    /// Sends `options` to `url` with the session token attached and returns the
    /// raw response whatever its status. Callers inspect `status()` themselves.
    pub async fn fetch(
        &self,
        url: &str,
        session: &Session,
        options: FetchOptions,
    ) -> Result<Response, FetchError> {
        let FetchOptions {
            method,
            headers,
            body,
        } = options;

        let headers = outgoing_headers(&headers, session, self.missing_token)?;
        let method = method.unwrap_or(Method::GET);

        let mut request = self.http.request(method.clone(), url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(%method, url, error = %e, "backend request failed");
            FetchError::Transport(e)
        })?;

        if !response.status().is_success() {
            tracing::warn!(%method, url, status = %response.status(), "backend responded with non-success status");
        }

        Ok(response)
    }
}
