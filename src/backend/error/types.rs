/**
 * Backend Error Types
 *
 * The HTTP-facing error taxonomy. Lower layers (store, tokens, credentials,
 * input validation) have their own error enums; they are folded into
 * `BackendError` at the service boundary (see `conversion.rs`).
 *
 * # Error Categories
 *
 * ## Authentication
 *
 * - `Unauthorized` - missing, malformed, invalid or expired bearer token
 * - `InvalidCredentials` - sign-in mismatch; the same for an unknown email
 *   and a wrong password
 *
 * ## Request
 *
 * - `Validation` - a request field was rejected
 * - `Conflict` - duplicate email, or a session owned by someone else
 * - `NotFound`
 *
 * ## Infrastructure
 *
 * - `ConnectionTimeout` / `OperationTimeout` - the store did not answer in
 *   time; safe to retry
 * - `Unavailable` - a dependency is not configured or not reachable
 * - `Upstream` - the text-generation service failed
 * - `Store` / `Internal` - reported as a generic 500, details only in logs
 */

use axum::http::StatusCode;
use std::time::Duration;
use thiserror::Error;

use crate::shared::SharedError;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] SharedError),

    #[error("store connection timed out after {0:?}")]
    ConnectionTimeout(Duration),

    #[error("store operation timed out after {0:?}")]
    OperationTimeout(Duration),

    #[error("{0}")]
    Unavailable(String),

    #[error("upstream service error: {0}")]
    Upstream(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl BackendError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `Unauthorized`, `InvalidCredentials` - 401
    /// - `Validation` - 400
    /// - `NotFound` - 404
    /// - `Conflict` - 409
    /// - `Upstream` - 502
    /// - `ConnectionTimeout`, `Unavailable` - 503
    /// - `OperationTimeout` - 504
    /// - `Store`, `Internal` - 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::ConnectionTimeout(_) | Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::OperationTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to clients
    pub fn message(&self) -> String {
        match self {
            Self::Validation(err) => err.client_message().to_string(),
            Self::ConnectionTimeout(_) => "Service temporarily unavailable".to_string(),
            Self::OperationTimeout(_) => "Request timed out".to_string(),
            Self::Upstream(_) => "Failed to get a response from the assistant".to_string(),
            Self::Store(_) | Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionTimeout(_) | Self::OperationTimeout(_) | Self::Unavailable(_)
        )
    }
}
