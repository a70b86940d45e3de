//! Authentication Module
//!
//! Password credentials, identity tokens and the account flows built on
//! them.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── credentials.rs  - bcrypt hashing and verification
//! ├── sessions.rs     - Identity tokens (HS256 JWT)
//! ├── service.rs      - Sign-up, sign-in, current user
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Signup**: email and password → account created → token returned
//! 2. **Signin**: email and password → hash verified → token returned
//! 3. **Me**: bearer token → token verified → account returned
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt (cost 12) before storage
//! - Tokens are stateless and expire after 7 days
//! - Invalid credentials return 401 without saying which field was wrong

/// bcrypt password hashing
pub mod credentials;

/// Identity token issuance and validation
pub mod sessions;

/// Account flows
pub mod service;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use credentials::{CredentialError, CredentialStore};
pub use handlers::{get_me, login, signup};
pub use service::{AuthService, AuthSession, SigninInput, SignupInput};
pub use sessions::{Identity, TokenError, TokenService};
