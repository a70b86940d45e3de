/**
 * Signup Handler
 *
 * POST /api/auth/signup
 *
 * # Registration Process
 *
 * 1. Validate and normalize email, password and name
 * 2. Hash the password (bcrypt, blocking pool)
 * 3. Create the user; a duplicate email is 409
 * 4. Issue a token and return it with the public user fields
 */

use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::auth::handlers::types::{AuthResponse, SignupRequest};
use crate::backend::auth::service::AuthService;
use crate::backend::error::BackendResult;
use crate::backend::middleware::JsonBody;

/// Signup handler
///
/// # Errors
///
/// * `400 Bad Request` - invalid email, short password
/// * `409 Conflict` - email already registered
/// * `503` / `504` - the store is unreachable or slow
///
/// # Example Request
///
/// ```http
/// POST /api/auth/signup HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "email": "a@x.com",
///   "password": "secret123",
///   "name": "Ada"
/// }
/// ```
pub async fn signup(
    State(auth): State<AuthService>,
    JsonBody(request): JsonBody<SignupRequest>,
) -> BackendResult<(StatusCode, Json<AuthResponse>)> {
    let input = request.validate().map_err(|e| {
        tracing::debug!("Signup rejected: {}", e);
        e
    })?;

    let session = auth.sign_up(input).await?;
    Ok((StatusCode::CREATED, Json(AuthResponse::from(session))))
}
