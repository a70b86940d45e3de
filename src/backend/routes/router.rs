/**
 * Router Configuration
 *
 * Combines the route groups into one Axum router and applies the
 * cross-cutting layers: request tracing and permissive CORS.
 */

use axum::{http::StatusCode, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::{configure_protected_routes, configure_public_routes};
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// 1. **Health**: `GET /health`
/// 2. **Public API**: sign-up and sign-in
/// 3. **Protected API**: everything else under `/api`
/// 4. **Fallback**: JSON 404
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new()
        .route("/health", get(health))
        .merge(configure_public_routes(Router::new()))
        .merge(configure_protected_routes(&app_state))
        .fallback(|| async { BackendError::not_found("Not found") });

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
