//! Shared Module
//!
//! This module contains types that do not depend on the server runtime:
//! input validation errors and application configuration. Both the backend
//! and the binary entry point use them.

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
