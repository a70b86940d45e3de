//! CareerCompass - Main Library
//!
//! CareerCompass is the backend of an AI career-counselling service. It
//! authenticates users, issues and verifies bearer tokens, and persists chat
//! transcripts, assessments and learning progress in a shared document store.
//!
//! # Module Structure
//!
//! - **`shared`** - Types with no server dependencies
//!   - Input validation errors
//!   - Environment-sourced configuration
//!
//! - **`backend`** - Server-side code (only compiled with the `ssr` feature)
//!   - Credential hashing and identity tokens
//!   - Lazy shared store connection with deadlines
//!   - Session persistence (Postgres or in-memory)
//!   - Axum HTTP handlers
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the backend modules and server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use careercompass::backend::server::init::create_app;
//! use careercompass::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let (app, state) = create_app(config).await?;
//! // Serve `app`, then `state.connections.close().await` on shutdown
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Expected failures (wrong password, expired token, duplicate email,
//! timeouts) are returned as typed errors. Only configuration errors abort
//! the process, and only at startup.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
