/**
 * Authentication Handler Types
 *
 * Request and response bodies for the auth endpoints. Request fields
 * default to empty so a missing field is reported by `validate` as a 400
 * with a field-specific message.
 */

use serde::{Deserialize, Serialize};

use crate::backend::auth::service::{AuthSession, SigninInput, SignupInput};
use crate::backend::store::UserAccount;
use crate::shared::SharedError;

const MIN_PASSWORD_LEN: usize = 8;
const MAX_NAME_LEN: usize = 100;

/// Sign up request
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct SignupRequest {
    pub email: String,
    /// Hashed before storage, never logged
    pub password: String,
    pub name: Option<String>,
}

impl SignupRequest {
    pub fn validate(self) -> Result<SignupInput, SharedError> {
        let email = normalize_email(&self.email)?;

        if self.password.is_empty() {
            return Err(SharedError::validation("password", "Password is required"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SharedError::validation(
                "password",
                "Password must be at least 8 characters",
            ));
        }

        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        if name.as_ref().is_some_and(|n| n.chars().count() > MAX_NAME_LEN) {
            return Err(SharedError::validation("name", "Name is too long"));
        }

        Ok(SignupInput {
            email,
            password: self.password,
            name,
        })
    }
}

/// Sign in request
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

impl SigninRequest {
    pub fn validate(self) -> Result<SigninInput, SharedError> {
        let email = normalize_email(&self.email)?;
        if self.password.is_empty() {
            return Err(SharedError::validation("password", "Password is required"));
        }
        Ok(SigninInput {
            email,
            password: self.password,
        })
    }
}

/// Trim and lower-case an email, rejecting anything without a local part
/// and a domain
pub fn normalize_email(raw: &str) -> Result<String, SharedError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(SharedError::validation("email", "Email is required"));
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(SharedError::validation("email", "Invalid email format"));
    }
    Ok(email)
}

/// Auth response
///
/// Returned by signup and signin: the bearer token plus the public user
/// fields.
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    /// Bearer token (7-day expiration)
    pub token: String,
    pub user: UserResponse,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.token,
            user: UserResponse::from(&session.user),
        }
    }
}

/// User response (without the password hash)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    pub created_at: String,
}

impl From<&UserAccount> for UserResponse {
    fn from(user: &UserAccount) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}
