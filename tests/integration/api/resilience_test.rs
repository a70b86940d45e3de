//! Store connection behaviour seen through the API
//!
//! The connection is opened by the first request, shared by every request
//! after it, and each store call is bounded by the operation deadline.

use axum::http::StatusCode;
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

use careercompass::backend::auth::Identity;
use careercompass::backend::store::memory::MemoryConnector;
use careercompass::backend::store::ConnectionState;

use crate::common::{create_unique_test_user, TestApp};

#[tokio::test]
async fn test_connection_is_lazy_and_shared() {
    let app = TestApp::with_connector(MemoryConnector::new().with_connect_delay(Duration::from_millis(50)));
    assert_eq!(app.connector.connect_count(), 0);
    assert_eq!(app.state.connections.state(), ConnectionState::Uninitialized);

    // Minted directly so nothing touches the store before the burst
    let token = app
        .state
        .tokens
        .issue(&Identity {
            id: Uuid::new_v4(),
            email: "cold@example.com".into(),
            name: None,
        })
        .unwrap();

    let requests = (0..8).map(|_| app.get("/api/user/data", Some(&token)));
    for response in futures_util::future::join_all(requests).await {
        crate::assert_status!(response, StatusCode::OK);
    }

    assert_eq!(app.connector.connect_count(), 1);
    assert_eq!(app.state.connections.connect_attempts(), 1);
    assert_eq!(app.state.connections.state(), ConnectionState::Ready);
}

#[tokio::test]
async fn test_slow_store_times_out_then_recovers() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app).await;

    app.connector.set_latency(Duration::from_secs(2));
    let slow = app.get("/api/user/data", Some(&user.token)).await;
    crate::assert_error_body!(slow, StatusCode::GATEWAY_TIMEOUT);

    app.connector.set_latency(Duration::ZERO);
    let ok = app.get("/api/user/data", Some(&user.token)).await;
    crate::assert_status!(ok, StatusCode::OK);
    assert_eq!(app.connector.connect_count(), 1);
}

#[tokio::test]
async fn test_failed_connect_is_retried_by_next_request() {
    let app = TestApp::new();
    app.connector.fail_next_connects(1);

    let failed = app
        .post(
            "/api/auth/signup",
            None,
            json!({ "email": "retry@example.com", "password": "password123" }),
        )
        .await;
    assert!(failed.status.is_server_error(), "got {}", failed.status);
    assert_eq!(failed.body["error"], "Service temporarily unavailable");

    let retried = app
        .post(
            "/api/auth/signup",
            None,
            json!({ "email": "retry@example.com", "password": "password123" }),
        )
        .await;
    crate::assert_status!(retried, StatusCode::CREATED);
}

#[tokio::test]
async fn test_close_then_reopen() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app).await;

    app.state.connections.close().await;
    assert_eq!(app.connector.close_count(), 1);
    assert_eq!(app.state.connections.state(), ConnectionState::Uninitialized);

    // Data survives in the memory backend; the next call reconnects
    let me = app.get("/api/auth/me", Some(&user.token)).await;
    crate::assert_status!(me, StatusCode::OK);
    assert_eq!(app.connector.connect_count(), 2);
}
