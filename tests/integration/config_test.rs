//! Environment configuration tests
//!
//! These mutate process environment variables, so they run serially.

use serial_test::serial;
use std::time::Duration;

use careercompass::backend::server::create_app;
use careercompass::shared::{AppConfig, ConfigError};

const VARS: &[&str] = &[
    "TOKEN_SECRET",
    "JWT_SECRET",
    "STORE_CONNECTION_STRING",
    "DATABASE_URL",
    "STORE_DATABASE_NAME",
    "STORE_CONNECT_TIMEOUT_MS",
    "STORE_OPERATION_TIMEOUT_MS",
    "SERVER_PORT",
    "GEMINI_API_KEY",
];

fn with_env<T>(pairs: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
    for var in VARS {
        std::env::remove_var(var);
    }
    for (key, value) in pairs {
        std::env::set_var(key, value);
    }
    let result = f();
    for var in VARS {
        std::env::remove_var(var);
    }
    result
}

#[test]
#[serial]
fn test_from_env_reads_primary_names() {
    let config = with_env(
        &[
            ("TOKEN_SECRET", "s3cret"),
            ("STORE_CONNECTION_STRING", "postgres://app:pw@db:5432/careers"),
            ("STORE_DATABASE_NAME", "careers_test"),
            ("STORE_OPERATION_TIMEOUT_MS", "2500"),
            ("SERVER_PORT", "8080"),
        ],
        AppConfig::from_env,
    )
    .unwrap();

    assert_eq!(config.token_secret, "s3cret");
    assert_eq!(config.store_database.as_deref(), Some("careers_test"));
    assert_eq!(config.operation_timeout, Duration::from_millis(2500));
    assert_eq!(config.port, 8080);
    assert!(config.gemini_api_key.is_none());
}

#[test]
#[serial]
fn test_from_env_accepts_legacy_names() {
    let config = with_env(
        &[("JWT_SECRET", "legacy"), ("DATABASE_URL", "memory://")],
        AppConfig::from_env,
    )
    .unwrap();

    assert_eq!(config.token_secret, "legacy");
    assert_eq!(config.store_url, "memory://");
}

#[test]
#[serial]
fn test_from_env_requires_secret_and_store() {
    let no_secret = with_env(&[("STORE_CONNECTION_STRING", "memory://")], AppConfig::from_env);
    assert_eq!(no_secret.unwrap_err(), ConfigError::MissingValue("TOKEN_SECRET"));

    let no_store = with_env(&[("TOKEN_SECRET", "s3cret")], AppConfig::from_env);
    assert_eq!(
        no_store.unwrap_err(),
        ConfigError::MissingValue("STORE_CONNECTION_STRING")
    );

    // Blank counts as missing
    let blank = with_env(
        &[("TOKEN_SECRET", "  "), ("STORE_CONNECTION_STRING", "memory://")],
        AppConfig::from_env,
    );
    assert_eq!(blank.unwrap_err(), ConfigError::MissingValue("TOKEN_SECRET"));
}

#[test]
#[serial]
fn test_debug_output_hides_secrets() {
    let config = with_env(
        &[
            ("TOKEN_SECRET", "very-secret-value"),
            ("STORE_CONNECTION_STRING", "postgres://app:hunter2@db/careers"),
            ("GEMINI_API_KEY", "gemini-key-value"),
        ],
        AppConfig::from_env,
    )
    .unwrap();

    let debug = format!("{:?}", config);
    assert!(!debug.contains("very-secret-value"));
    assert!(!debug.contains("hunter2"));
    assert!(!debug.contains("gemini-key-value"));
}

#[tokio::test]
async fn test_create_app_rejects_unknown_scheme() {
    let config = AppConfig::builder()
        .token_secret("s3cret")
        .store_url("redis://localhost:6379")
        .build()
        .unwrap();

    let result = create_app(config).await;
    assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
}

#[tokio::test]
async fn test_create_app_does_not_connect() {
    let config = AppConfig::builder()
        .token_secret("s3cret")
        .store_url("memory://")
        .build()
        .unwrap();

    let (_router, state) = create_app(config).await.unwrap();
    assert_eq!(state.connections.connect_attempts(), 0);
    assert!(state.responder.is_none());
}

#[tokio::test]
async fn test_create_app_keeps_config() {
    let config = AppConfig::builder()
        .token_secret("s3cret")
        .store_url("memory://")
        .port(8123)
        .operation_timeout(Duration::from_millis(750))
        .build()
        .unwrap();

    let (_router, state) = create_app(config).await.unwrap();
    assert_eq!(state.config.port, 8123);
    assert_eq!(state.config.operation_timeout, Duration::from_millis(750));
}
