/**
 * Server Configuration
 *
 * Turns an `AppConfig` into the concrete services: the store connector
 * (chosen by the connection string's scheme) and the optional
 * text-generation client.
 *
 * | Scheme                        | Store                      |
 * |-------------------------------|----------------------------|
 * | `postgres://`, `postgresql://` | PostgreSQL via sqlx        |
 * | `memory://`                   | In-process, lost on exit   |
 */

use std::sync::Arc;

use crate::backend::chat::{GeminiResponder, Responder};
use crate::backend::store::memory::MemoryConnector;
use crate::backend::store::postgres::PgConnector;
use crate::backend::store::Connector;
use crate::shared::config::redact_url;
use crate::shared::{AppConfig, ConfigError};

/// Pick the store backend for `config.store_url`
pub fn select_connector(config: &AppConfig) -> Result<Arc<dyn Connector>, ConfigError> {
    let url = config.store_url.trim();
    let scheme = url
        .split_once("://")
        .map(|(scheme, _)| scheme.to_ascii_lowercase())
        .ok_or_else(|| ConfigError::InvalidUrl(redact_url(url)))?;

    match scheme.as_str() {
        "postgres" | "postgresql" => Ok(Arc::new(PgConnector::new(
            url,
            config.store_database.clone(),
        ))),
        "memory" => {
            tracing::warn!("Using in-memory store; data is lost when the process exits");
            Ok(Arc::new(MemoryConnector::new()))
        }
        _ => Err(ConfigError::InvalidUrl(redact_url(url))),
    }
}

/// Build the text-generation client, if a key is configured
pub fn load_responder(config: &AppConfig) -> Option<Arc<dyn Responder>> {
    match &config.gemini_api_key {
        Some(key) => {
            tracing::info!("Chat enabled with model {}", config.gemini_model);
            Some(Arc::new(GeminiResponder::new(
                key.clone(),
                &config.gemini_model,
                config.gemini_base_url.as_deref(),
            )))
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set. Chat will be unavailable.");
            None
        }
    }
}
