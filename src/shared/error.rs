//! Shared Error Types
//!
//! Input that was rejected before it reached the credential or session
//! layers. The backend reports both variants as `400 Bad Request`.
//!
//! # Usage
//!
//! ```rust
//! use careercompass::shared::error::SharedError;
//!
//! let error = SharedError::validation("email", "Email is required");
//! assert_eq!(error.field(), Some("email"));
//! ```
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// The body could not be parsed as the expected JSON shape
    #[error("Malformed request body: {message}")]
    MalformedBody { message: String },

    /// A request field failed validation
    #[error("Invalid {field}: {message}")]
    ValidationError {
        field: String,
        /// Client-facing text
        message: String,
    },
}

impl SharedError {
    pub fn malformed_body(message: impl Into<String>) -> Self {
        Self::MalformedBody {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The offending field, if the error is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::ValidationError { field, .. } => Some(field),
            Self::MalformedBody { .. } => None,
        }
    }

    /// Text returned to the client
    pub fn client_message(&self) -> &str {
        match self {
            Self::ValidationError { message, .. } | Self::MalformedBody { message } => message,
        }
    }
}
