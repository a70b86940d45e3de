/**
 * Authentication Middleware
 *
 * Verifies the `Authorization: Bearer <token>` header on protected routes
 * and attaches the token's `Identity` to the request extensions. A missing,
 * malformed or invalid token is rejected with 401 before the handler (and
 * therefore before any store access) runs.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::backend::auth::sessions::{Identity, TokenService};
use crate::backend::error::BackendError;

/// Extract the token from an `Authorization: Bearer <token>` header
///
/// The scheme is matched case-insensitively. Returns `None` when the header
/// is absent, not UTF-8, uses another scheme or carries an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Authentication middleware
///
/// 1. Extracts the bearer token
/// 2. Verifies signature and expiry
/// 3. Inserts the `Identity` into request extensions
pub async fn auth_middleware(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = bearer_token(request.headers()).ok_or_else(|| {
        tracing::debug!("Missing or malformed Authorization header");
        BackendError::Unauthorized
    })?;

    let identity = tokens.verify(token)?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated identity
///
/// Only valid on routes behind [`auth_middleware`]; elsewhere it rejects
/// with 401.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Identity);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("Identity not found in request extensions");
                BackendError::Unauthorized
            })
    }
}
