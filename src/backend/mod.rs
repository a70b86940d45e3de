//! Backend Module
//!
//! All server-side code: credential and token handling, the shared store
//! connection, session persistence and the Axum HTTP surface. Only compiled
//! with the `ssr` feature.
//!
//! # Architecture
//!
//! - **`server`** - Application state, service selection, app creation
//! - **`routes`** - Router assembly and layers
//! - **`auth`** - Credentials, tokens, sign-up/sign-in flows
//! - **`middleware`** - Bearer token verification
//! - **`store`** - Connection manager, session store, Postgres and memory backends
//! - **`timeout`** - Deadline guard for store calls
//! - **`chat`** - Career counselor conversations
//! - **`assessments`** - Assessments, learning progress, user data
//! - **`error`** - HTTP-facing error taxonomy
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - State and initialization
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! ├── store/          - Persistence
//! ├── timeout.rs      - Deadlines
//! ├── chat/           - Chat handlers and text generation
//! ├── assessments/    - Assessment and progress handlers
//! └── error/          - Error types
//! ```
//!
//! # Request Flow
//!
//! ```text
//! request → TraceLayer → CORS → auth_middleware (protected routes)
//!         → handler → AuthService / SessionStore
//!         → ConnectionManager (lazy, shared) → with_deadline → store
//! ```
//!
//! # Error Handling
//!
//! Handlers return `Result<_, BackendError>`. Store, token and credential
//! errors convert with `?`; `BackendError` renders as
//! `{"error": ..., "status": ...}`.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Persistence
pub mod store;

/// Deadline guard
pub mod timeout;

/// Career counselor chat
pub mod chat;

/// Assessments and learning progress
pub mod assessments;

/// Backend error types
pub mod error;

pub use error::BackendError;
pub use server::{create_app, AppState};
