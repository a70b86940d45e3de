/**
 * Authentication Flows
 *
 * Composes credentials, tokens and the session store into the sign-up,
 * sign-in and current-user flows. Inputs arrive already validated and
 * normalized (see `handlers::types`).
 */

use std::sync::Arc;

use crate::backend::auth::credentials::CredentialStore;
use crate::backend::auth::sessions::{Identity, TokenService};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::store::{SessionStore, UserAccount};

/// Validated sign-up fields
#[derive(Clone)]
pub struct SignupInput {
    /// Trimmed, lower-cased
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// Validated sign-in fields
#[derive(Clone)]
pub struct SigninInput {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SignupInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupInput")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}

impl std::fmt::Debug for SigninInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigninInput")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A freshly authenticated user and their token
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: UserAccount,
}

#[derive(Clone)]
pub struct AuthService {
    store: SessionStore,
    credentials: CredentialStore,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(store: SessionStore, credentials: CredentialStore, tokens: Arc<TokenService>) -> Self {
        Self {
            store,
            credentials,
            tokens,
        }
    }

    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    /// Register a new account and sign it in
    ///
    /// # Errors
    ///
    /// * `Conflict` - the email is already registered
    /// * store timeouts and failures
    pub async fn sign_up(&self, input: SignupInput) -> BackendResult<AuthSession> {
        let password_hash = self.credentials.hash_blocking(input.password).await?;

        let user = self
            .store
            .create_user(&input.email, password_hash, input.name)
            .await?;
        tracing::info!("User registered: {}", user.id);

        let token = self.tokens.issue(&Identity::from(&user))?;
        Ok(AuthSession { token, user })
    }

    /// Authenticate with email and password
    ///
    /// An unknown email and a wrong password are both `InvalidCredentials`,
    /// and both cost one bcrypt verification.
    pub async fn sign_in(&self, input: SigninInput) -> BackendResult<AuthSession> {
        let user = match self.store.find_user_by_email(&input.email).await? {
            Some(user) => user,
            None => {
                self.credentials.verify_decoy(input.password).await;
                tracing::debug!("Sign-in failed");
                return Err(BackendError::InvalidCredentials);
            }
        };

        let matched = self
            .credentials
            .verify_blocking(input.password, user.password_hash.clone())
            .await;
        if !matched {
            tracing::debug!("Sign-in failed");
            return Err(BackendError::InvalidCredentials);
        }

        tracing::info!("User signed in: {}", user.id);
        let token = self.tokens.issue(&Identity::from(&user))?;
        Ok(AuthSession { token, user })
    }

    /// Load the account behind a verified token
    ///
    /// A token for an account that no longer exists is `Unauthorized`.
    pub async fn current_user(&self, identity: &Identity) -> BackendResult<UserAccount> {
        self.store
            .find_user_by_id(identity.id)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Token for unknown user {}", identity.id);
                BackendError::Unauthorized
            })
    }
}
