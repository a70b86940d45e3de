//! Application fixtures
//!
//! Builds the full router over a `memory://` store, a low-cost credential
//! store and a stub responder, so API tests run without Postgres or the
//! text-generation service.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use careercompass::backend::auth::CredentialStore;
use careercompass::backend::chat::{ChatTurn, Responder, ResponderError};
use careercompass::backend::routes::create_router;
use careercompass::backend::server::AppState;
use careercompass::backend::store::memory::MemoryConnector;
use careercompass::shared::AppConfig;

pub const TEST_SECRET: &str = "test-token-secret";

/// Replies with a deterministic echo and counts calls
#[derive(Default)]
pub struct StubResponder {
    calls: AtomicUsize,
    /// History length seen by the most recent call
    last_history: AtomicUsize,
    fail: bool,
}

impl StubResponder {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_history_len(&self) -> usize {
        self.last_history.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Responder for StubResponder {
    async fn reply(&self, history: &[ChatTurn], message: &str) -> Result<String, ResponderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_history.store(history.len(), Ordering::SeqCst);
        if self.fail {
            return Err(ResponderError::Status(500));
        }
        Ok(format!("Advice about: {}", message))
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub connector: Arc<MemoryConnector>,
    pub responder: Option<Arc<StubResponder>>,
}

/// A decoded response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// JSON body, or a JSON string holding the raw text
    pub body: Value,
}

pub fn test_config() -> AppConfig {
    AppConfig::builder()
        .token_secret(TEST_SECRET)
        .store_url("memory://")
        .connect_timeout(Duration::from_secs(2))
        .operation_timeout(Duration::from_millis(500))
        .build()
        .expect("test config is valid")
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(Some(Arc::new(StubResponder::default())))
    }

    /// No text-generation service configured
    pub fn without_responder() -> Self {
        Self::build(None)
    }

    pub fn with_responder(responder: StubResponder) -> Self {
        Self::build(Some(Arc::new(responder)))
    }

    /// Use a preconfigured store, e.g. one with a connect delay
    pub fn with_connector(connector: MemoryConnector) -> Self {
        Self::assemble(connector, Some(Arc::new(StubResponder::default())))
    }

    fn build(responder: Option<Arc<StubResponder>>) -> Self {
        Self::assemble(MemoryConnector::new(), responder)
    }

    fn assemble(connector: MemoryConnector, responder: Option<Arc<StubResponder>>) -> Self {
        let connector = Arc::new(connector);
        let state = AppState::new(
            test_config(),
            connector.clone(),
            CredentialStore::with_cost(4),
            responder.clone().map(|r| r as Arc<dyn Responder>),
        );
        let router = create_router(state.clone());

        Self {
            router,
            state,
            connector,
            responder,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(request(Method::GET, uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(request(Method::POST, uri, token, Some(body))).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a request with an optional bearer token and JSON body
pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, crate::common::auth_header(token));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("request is valid")
}
