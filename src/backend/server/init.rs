/**
 * Server Initialization
 *
 * # Initialization Process
 *
 * 1. Select the store connector from the connection string
 * 2. Build the text-generation client (optional)
 * 3. Wire `AppState` (no store connection is opened yet)
 * 4. Create the router with all routes and layers
 */

use axum::Router;

use crate::backend::auth::CredentialStore;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_responder, select_connector};
use crate::backend::server::state::AppState;
use crate::shared::{AppConfig, ConfigError};

/// Create and configure the Axum application
///
/// # Returns
///
/// The router and the state behind it. Keep the state to close the store
/// connection at shutdown.
///
/// # Errors
///
/// `ConfigError::InvalidUrl` if the store connection string has an
/// unsupported scheme.
pub async fn create_app(config: AppConfig) -> Result<(Router, AppState), ConfigError> {
    tracing::info!("Initializing CareerCompass backend server");
    tracing::debug!("Configuration: {:?}", config);

    let connector = select_connector(&config)?;
    tracing::info!("Store backend: {}", connector.describe());

    let responder = load_responder(&config);
    let state = AppState::new(config, connector, CredentialStore::new(), responder);

    let app = create_router(state.clone());
    tracing::info!("Router configured");

    Ok((app, state))
}
