/**
 * Signin Handler
 *
 * POST /api/auth/signin (also mounted at /api/auth/login)
 *
 * Unknown email and wrong password produce the same 401 body.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{AuthResponse, SigninRequest};
use crate::backend::auth::service::AuthService;
use crate::backend::error::BackendResult;
use crate::backend::middleware::JsonBody;

/// Signin handler
///
/// # Example Request
///
/// ```http
/// POST /api/auth/signin HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "email": "a@x.com",
///   "password": "secret123"
/// }
/// ```
///
/// # Example Response
///
/// ```json
/// {
///   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
///   "user": { "id": "...", "email": "a@x.com", "createdAt": "..." }
/// }
/// ```
pub async fn login(
    State(auth): State<AuthService>,
    JsonBody(request): JsonBody<SigninRequest>,
) -> BackendResult<Json<AuthResponse>> {
    let input = request.validate()?;
    let session = auth.sign_in(input).await?;
    Ok(Json(AuthResponse::from(session)))
}
