/**
 * Error Conversion
 *
 * Folds the lower-layer errors into `BackendError` and renders
 * `BackendError` as an HTTP response.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "Error message",
 *   "status": 400
 * }
 * ```
 */

use axum::{
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::auth::credentials::CredentialError;
use crate::backend::auth::sessions::TokenError;
use crate::backend::chat::responder::ResponderError;
use crate::backend::error::types::BackendError;
use crate::backend::store::StoreError;

impl From<StoreError> for BackendError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(message) => Self::Conflict(message),
            StoreError::ConnectionTimeout(after) => Self::ConnectionTimeout(after),
            StoreError::OperationTimeout(after) => Self::OperationTimeout(after),
            StoreError::Connection(message) => {
                tracing::error!("Store unreachable: {}", message);
                Self::Unavailable("Service temporarily unavailable".to_string())
            }
            StoreError::Backend(message) => Self::Store(message),
        }
    }
}

impl From<TokenError> for BackendError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => Self::Unauthorized,
            TokenError::Signing(message) => Self::Internal(message),
        }
    }
}

impl From<CredentialError> for BackendError {
    fn from(err: CredentialError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ResponderError> for BackendError {
    fn from(err: ResponderError) -> Self {
        Self::Upstream(err.to_string())
    }
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Request failed ({}): {}", status.as_u16(), self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status.as_u16(), self);
        }

        let body = serde_json::json!({
            "error": self.message(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
