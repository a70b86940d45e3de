//! Middleware Module
//!
//! Request processing that runs before handlers.
//!
//! - **`auth`** - bearer token verification for protected routes
//! - **`json`** - JSON bodies with uniform error responses

pub mod auth;
pub mod json;

pub use auth::{auth_middleware, bearer_token, AuthUser};
pub use json::JsonBody;
