//! Route Configuration Module
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation and layers
//! └── api_routes.rs   - Public and protected API routes
//! ```

/// Main router creation
pub mod router;

/// API route groups
pub mod api_routes;

pub use router::create_router;
