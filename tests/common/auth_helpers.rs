//! Authentication test helpers
//!
//! Provides utilities for registering test users through the API and
//! building authorization headers.

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::common::app::TestApp;

pub const TEST_PASSWORD: &str = "test_password_123";

/// Test user credentials
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub password: String,
    pub token: String,
}

/// Register a user through `POST /api/auth/signup`
pub async fn create_test_user(app: &TestApp, email: &str, password: &str) -> TestUser {
    let response = app
        .post(
            "/api/auth/signup",
            None,
            json!({ "email": email, "password": password }),
        )
        .await;
    assert_eq!(
        response.status,
        StatusCode::CREATED,
        "signup failed: {}",
        response.body
    );

    TestUser {
        id: response.body["user"]["id"].as_str().unwrap_or_default().to_string(),
        email: response.body["user"]["email"].as_str().unwrap_or_default().to_string(),
        password: password.to_string(),
        token: response.body["token"].as_str().unwrap_or_default().to_string(),
    }
}

/// Register a user with a unique email
pub async fn create_unique_test_user(app: &TestApp) -> TestUser {
    let email = format!("test_{}@example.com", Uuid::new_v4().simple());
    create_test_user(app, &email, TEST_PASSWORD).await
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
