//! Application configuration module
//!
//! All settings are sourced from the process environment at startup (a
//! `.env` file is honoured by the server binary). A missing signing secret
//! or store connection string is a fatal [`ConfigError`]; there is no
//! built-in fallback secret.

use std::time::Duration;
use thiserror::Error;

/// Default bound on establishing the store connection
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default bound on a single store operation
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(8);

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;

/// Default text-generation model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

/// Application configuration
#[derive(Clone)]
pub struct AppConfig {
    /// Secret used to sign and verify identity tokens
    pub token_secret: String,
    /// Store connection string (`postgres://...` or `memory://`)
    pub store_url: String,
    /// Optional database name overriding the one in `store_url`
    pub store_database: Option<String>,
    /// Deadline for establishing the store connection
    pub connect_timeout: Duration,
    /// Deadline for each store operation
    pub operation_timeout: Duration,
    /// Port the HTTP server binds to
    pub port: u16,
    /// API key for the text-generation service; chat is disabled without it
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("token_secret", &"<redacted>")
            .field("store_url", &redact_url(&self.store_url))
            .field("store_database", &self.store_database)
            .field("connect_timeout", &self.connect_timeout)
            .field("operation_timeout", &self.operation_timeout)
            .field("port", &self.port)
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .finish()
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// Empty values are treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut builder = AppConfig::builder();

        if let Some(secret) = get("TOKEN_SECRET").or_else(|| get("JWT_SECRET")) {
            builder = builder.token_secret(secret);
        }
        if let Some(url) = get("STORE_CONNECTION_STRING").or_else(|| get("DATABASE_URL")) {
            builder = builder.store_url(url);
        }
        if let Some(name) = get("STORE_DATABASE_NAME") {
            builder = builder.store_database(name);
        }
        if let Some(ms) = get("STORE_CONNECT_TIMEOUT_MS") {
            builder = builder.connect_timeout(parse_millis("STORE_CONNECT_TIMEOUT_MS", &ms)?);
        }
        if let Some(ms) = get("STORE_OPERATION_TIMEOUT_MS") {
            builder = builder.operation_timeout(parse_millis("STORE_OPERATION_TIMEOUT_MS", &ms)?);
        }
        if let Some(port) = get("SERVER_PORT") {
            let port = port.trim().parse::<u16>().map_err(|e| {
                ConfigError::InvalidValue("SERVER_PORT", e.to_string())
            })?;
            builder = builder.port(port);
        }
        if let Some(key) = get("GEMINI_API_KEY") {
            builder = builder.gemini_api_key(key);
        }
        if let Some(model) = get("GEMINI_MODEL") {
            builder = builder.gemini_model(model);
        }
        if let Some(url) = get("GEMINI_BASE_URL") {
            builder = builder.gemini_base_url(url);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_secret.trim().is_empty() {
            return Err(ConfigError::MissingValue("TOKEN_SECRET"));
        }
        if self.store_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("STORE_CONNECTION_STRING"));
        }
        if !self.store_url.contains("://") {
            return Err(ConfigError::InvalidUrl(redact_url(&self.store_url)));
        }
        if self.connect_timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "STORE_CONNECT_TIMEOUT_MS",
                "must be greater than zero".to_string(),
            ));
        }
        if self.operation_timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "STORE_OPERATION_TIMEOUT_MS",
                "must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    token_secret: Option<String>,
    store_url: Option<String>,
    store_database: Option<String>,
    connect_timeout: Option<Duration>,
    operation_timeout: Option<Duration>,
    port: Option<u16>,
    gemini_api_key: Option<String>,
    gemini_model: Option<String>,
    gemini_base_url: Option<String>,
}

impl AppConfigBuilder {
    pub fn token_secret(mut self, secret: impl Into<String>) -> Self {
        self.token_secret = Some(secret.into());
        self
    }

    pub fn store_url(mut self, url: impl Into<String>) -> Self {
        self.store_url = Some(url.into());
        self
    }

    pub fn store_database(mut self, name: impl Into<String>) -> Self {
        self.store_database = Some(name.into());
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn gemini_api_key(mut self, key: impl Into<String>) -> Self {
        self.gemini_api_key = Some(key.into());
        self
    }

    pub fn gemini_model(mut self, model: impl Into<String>) -> Self {
        self.gemini_model = Some(model.into());
        self
    }

    pub fn gemini_base_url(mut self, url: impl Into<String>) -> Self {
        self.gemini_base_url = Some(url.into());
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig {
            token_secret: self
                .token_secret
                .ok_or(ConfigError::MissingValue("TOKEN_SECRET"))?,
            store_url: self
                .store_url
                .ok_or(ConfigError::MissingValue("STORE_CONNECTION_STRING"))?,
            store_database: self.store_database,
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            operation_timeout: self.operation_timeout.unwrap_or(DEFAULT_OPERATION_TIMEOUT),
            port: self.port.unwrap_or(DEFAULT_PORT),
            gemini_api_key: self.gemini_api_key,
            gemini_model: self
                .gemini_model
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: self.gemini_base_url,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

fn parse_millis(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| ConfigError::InvalidValue(key, e.to_string()))
}

/// Strip credentials from a connection URL before it is logged
pub fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
