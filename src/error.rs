use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{fetch::FetchError, models::ErrorBody};

/// ConsoleError
///
/// Everything a console handler can fail with. Backend HTTP statuses are kept
/// as-is so the browser sees exactly what the backend said.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// A form failed client-side validation; the backend was not called.
    #[error("{0}")]
    Validation(String),
    /// The order is not among the store's current orders.
    #[error("order `{0}` not found")]
    OrderNotFound(String),
    /// The backend answered with a non-success status.
    #[error("backend responded with {0}")]
    BackendStatus(StatusCode),
    /// The backend answered 2xx with a body of the wrong shape.
    #[error("unexpected backend payload: {0}")]
    UnexpectedPayload(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
    /// The configured API base URL cannot carry path segments.
    #[error("invalid backend url: {0}")]
    BackendUrl(String),
}

impl ConsoleError {
    pub fn status(&self) -> StatusCode {
        match self {
            ConsoleError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ConsoleError::OrderNotFound(_) => StatusCode::NOT_FOUND,
            ConsoleError::BackendStatus(status) => *status,
            ConsoleError::UnexpectedPayload(_) => StatusCode::BAD_GATEWAY,
            ConsoleError::Fetch(FetchError::Transport(_)) => StatusCode::BAD_GATEWAY,
            ConsoleError::Fetch(FetchError::InvalidHeader(_)) => StatusCode::BAD_REQUEST,
            ConsoleError::Encode(_) | ConsoleError::BackendUrl(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, %status, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
