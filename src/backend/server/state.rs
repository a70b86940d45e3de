/**
 * Application State Management
 *
 * `AppState` is the central state container shared by every request
 * handler. Everything in it is cheap to clone (`Arc` handles or structs of
 * them).
 *
 * # State Extraction
 *
 * The `FromRef` implementations let handlers and middleware extract only
 * what they use (`State<AuthService>`, `State<Arc<TokenService>>`, ...)
 * instead of the whole `AppState`.
 */

use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::auth::{AuthService, CredentialStore, TokenService};
use crate::backend::chat::Responder;
use crate::backend::store::{ConnectionManager, Connector, SessionStore};
use crate::backend::timeout::Deadlines;
use crate::shared::AppConfig;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Owner of the process-wide store connection; closed at shutdown
    pub connections: Arc<ConnectionManager>,
    pub store: SessionStore,
    pub auth: AuthService,
    pub tokens: Arc<TokenService>,
    /// `None` when no text-generation key is configured
    pub responder: Option<Arc<dyn Responder>>,
}

impl AppState {
    /// Wire the services together
    ///
    /// No store connection is opened here; the first store operation does
    /// that.
    pub fn new(
        config: AppConfig,
        connector: Arc<dyn Connector>,
        credentials: CredentialStore,
        responder: Option<Arc<dyn Responder>>,
    ) -> Self {
        let deadlines = Deadlines::from(&config);
        let connections = Arc::new(ConnectionManager::new(connector, deadlines.connect));
        let store = SessionStore::new(connections.clone(), deadlines.operation);
        let tokens = Arc::new(TokenService::new(&config.token_secret));
        let auth = AuthService::new(store.clone(), credentials, tokens.clone());

        Self {
            config: Arc::new(config),
            connections,
            store,
            auth,
            tokens,
            responder,
        }
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
