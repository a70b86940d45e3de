/**
 * API Route Handlers
 *
 * # Routes
 *
 * ## Authentication (public)
 * - `POST /api/auth/signup` - User registration
 * - `POST /api/auth/signin` - User sign-in (`/api/auth/login` is an alias)
 *
 * ## Protected (bearer token required)
 * - `GET /api/auth/me` - Current user
 * - `POST /api/chat` - Chat exchange
 * - `GET /api/chat/{session_id}` - Transcript
 * - `POST /api/assessments` - Save an assessment
 * - `POST /api/progress` - Record learning progress
 * - `GET /api/user/data` - Dashboard summary
 */

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::backend::assessments::{record_progress, save_assessment, user_data};
use crate::backend::auth::{get_me, login, signup};
use crate::backend::chat::{get_transcript, send_message};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;

/// Routes reachable without a token
pub fn configure_public_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/signin", post(login))
        .route("/api/auth/login", post(login))
}

/// Routes behind the auth middleware
///
/// The middleware is attached with `route_layer`, so unknown paths still
/// fall through to the 404 fallback instead of answering 401.
pub fn configure_protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/me", get(get_me))
        .route("/api/chat", post(send_message))
        .route("/api/chat/{session_id}", get(get_transcript))
        .route("/api/assessments", post(save_assessment))
        .route("/api/progress", post(record_progress))
        .route("/api/user/data", get(user_data))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}
