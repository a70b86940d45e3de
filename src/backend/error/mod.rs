//! Backend Error Module
//!
//! HTTP-facing error taxonomy and its conversions.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - BackendError and status mapping
//! └── conversion.rs - From impls for lower layers, IntoResponse
//! ```
//!
//! Handlers return `Result<_, BackendError>` and use `?` on store, token
//! and credential results directly.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::BackendError;

pub type BackendResult<T> = Result<T, BackendError>;
