//! Server Module
//!
//! Initialization and configuration of the Axum HTTP server.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Store connector and responder selection
//! └── init.rs         - App creation
//! ```
//!
//! # Lifecycle
//!
//! `create_app` wires the services without touching the network. The store
//! connection is opened by the first request that needs it and closed by
//! the binary after graceful shutdown via `AppState::connections`.

/// Application state management
pub mod state;

/// Service selection from configuration
pub mod config;

/// Server initialization
pub mod init;

pub use init::create_app;
pub use state::AppState;
