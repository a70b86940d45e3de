/**
 * Password Credentials
 *
 * bcrypt hashing and verification for user passwords. Plaintext passwords
 * are never stored, logged or compared directly.
 *
 * bcrypt at cost 12 takes a few hundred milliseconds of CPU, so request
 * handlers go through the `*_blocking` variants, which run on tokio's
 * blocking pool.
 */

use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Default bcrypt work factor
pub const PASSWORD_COST: u32 = 12;

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// Compared against when the email is unknown, so sign-in takes the same
/// time whether or not the account exists.
const DECOY_PASSWORD: &str = "careercompass-decoy-password";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("hashing task failed: {0}")]
    Task(String),
}

/// Hashes and verifies passwords
#[derive(Clone, Debug)]
pub struct CredentialStore {
    cost: u32,
    decoy: Arc<OnceLock<String>>,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::with_cost(PASSWORD_COST)
    }

    /// Use a different work factor, clamped to bcrypt's 4..=31
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
            decoy: Arc::new(OnceLock::new()),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password with a fresh salt
    pub fn hash(&self, password: &str) -> Result<String, CredentialError> {
        bcrypt::hash(password, self.cost).map_err(|e| CredentialError::Hash(e.to_string()))
    }

    /// Check a password against a stored hash
    ///
    /// A mismatch and a malformed hash both return `false`.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }

    /// [`hash`](Self::hash) on the blocking pool
    pub async fn hash_blocking(&self, password: String) -> Result<String, CredentialError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.hash(&password))
            .await
            .map_err(|e| CredentialError::Task(e.to_string()))?
    }

    /// [`verify`](Self::verify) on the blocking pool
    pub async fn verify_blocking(&self, password: String, hash: String) -> bool {
        let this = self.clone();
        match tokio::task::spawn_blocking(move || this.verify(&password, &hash)).await {
            Ok(matched) => matched,
            Err(e) => {
                tracing::error!("Password verification task failed: {}", e);
                false
            }
        }
    }

    /// Spend one verification's worth of work against a decoy hash
    pub async fn verify_decoy(&self, password: String) {
        let this = self.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            let decoy = this
                .decoy
                .get_or_init(|| this.hash(DECOY_PASSWORD).unwrap_or_default());
            this.verify(&password, decoy)
        })
        .await;

        if let Err(e) = outcome {
            tracing::error!("Decoy verification task failed: {}", e);
        }
    }
}
