//! Authentication Handlers Module
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── types.rs    - Request/response types and input validation
//! ├── signup.rs   - POST /api/auth/signup
//! ├── login.rs    - POST /api/auth/signin (alias /api/auth/login)
//! └── me.rs       - GET /api/auth/me
//! ```

/// Request and response types
pub mod types;

/// Signup handler
pub mod signup;

/// Signin handler
pub mod login;

/// Get current user handler
pub mod me;

pub use types::{AuthResponse, SigninRequest, SignupRequest, UserResponse};

pub use login::login;
pub use me::get_me;
pub use signup::signup;
