//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - An in-memory application builder with a stub responder
//! - Request and authentication helpers
//! - Response assertion macros

pub mod assertions;
#[cfg(feature = "ssr")]
pub mod app;
#[cfg(feature = "ssr")]
pub mod auth_helpers;

// Re-export commonly used utilities
#[cfg(feature = "ssr")]
pub use app::*;
#[cfg(feature = "ssr")]
pub use auth_helpers::*;
