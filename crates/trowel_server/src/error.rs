//! Error types for the sync server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use trowel_store::StoreError;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the sync server.
///
/// Protocol outcomes (`conflict`, `missing`) are not errors; they are
/// fully-formed push responses.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A request path contained a parent-directory token or was otherwise
    /// malformed.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// The request body or headers were malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ServerError {
    /// Returns the HTTP status this error maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::InvalidPath(_)
            | ServerError::InvalidRequest(_)
            | ServerError::Store(StoreError::InvalidName(_)) => StatusCode::BAD_REQUEST,
            ServerError::Store(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            ServerError::Store(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns true if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }

    /// Returns true if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::info!(error = %self, "request rejected");
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
