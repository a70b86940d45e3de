/**
 * Get Current User Handler
 *
 * GET /api/auth/me
 *
 * The bearer token has already been verified by the auth middleware; this
 * handler only confirms the account still exists.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::auth::service::AuthService;
use crate::backend::error::BackendResult;
use crate::backend::middleware::auth::AuthUser;

/// # Errors
///
/// * `401 Unauthorized` - missing/invalid token, or the account is gone
pub async fn get_me(
    State(auth): State<AuthService>,
    AuthUser(identity): AuthUser,
) -> BackendResult<Json<UserResponse>> {
    let user = auth.current_user(&identity).await?;
    Ok(Json(UserResponse::from(&user)))
}
