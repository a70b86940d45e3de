//! Chat API integration tests
//!
//! Exchanges are appended to the session transcript; transcripts are
//! visible only to their owner.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{create_unique_test_user, StubResponder, TestApp};

#[tokio::test]
async fn test_chat_appends_exchanges_in_order() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app).await;

    let first = app
        .post(
            "/api/chat",
            Some(&user.token),
            json!({ "message": "I enjoy maths", "sessionId": "session-1" }),
        )
        .await;
    crate::assert_status!(first, StatusCode::OK);
    assert_eq!(first.body["response"], "Advice about: I enjoy maths");
    assert_eq!(first.body["sessionId"], "session-1");

    let second = app
        .post(
            "/api/chat",
            Some(&user.token),
            json!({
                "message": "What should I study?",
                "sessionId": "session-1",
                "conversationHistory": [
                    { "role": "user", "parts": [{ "text": "I enjoy maths" }] },
                    { "role": "model", "parts": [{ "text": "Advice about: I enjoy maths" }] }
                ]
            }),
        )
        .await;
    crate::assert_status!(second, StatusCode::OK);
    assert_eq!(app.responder.as_ref().unwrap().last_history_len(), 2);

    let transcript = app.get("/api/chat/session-1", Some(&user.token)).await;
    crate::assert_status!(transcript, StatusCode::OK);
    assert_eq!(transcript.body["sessionId"], "session-1");
    assert_eq!(transcript.body["userId"], user.id.as_str());

    let messages = transcript.body["messages"].as_array().unwrap();
    let flat: Vec<(&str, &str)> = messages
        .iter()
        .map(|m| (m["role"].as_str().unwrap(), m["content"].as_str().unwrap()))
        .collect();
    assert_eq!(
        flat,
        vec![
            ("user", "I enjoy maths"),
            ("assistant", "Advice about: I enjoy maths"),
            ("user", "What should I study?"),
            ("assistant", "Advice about: What should I study?"),
        ]
    );
}

#[tokio::test]
async fn test_chat_without_session_id_starts_new_session() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app).await;

    let response = app
        .post("/api/chat", Some(&user.token), json!({ "message": "Hello" }))
        .await;
    crate::assert_status!(response, StatusCode::OK);

    let session_id = response.body["sessionId"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(session_id).is_ok());

    let transcript = app
        .get(&format!("/api/chat/{}", session_id), Some(&user.token))
        .await;
    crate::assert_status!(transcript, StatusCode::OK);
    assert_eq!(transcript.body["messages"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_transcript_is_owner_only() {
    let app = TestApp::new();
    let owner = create_unique_test_user(&app).await;
    let other = create_unique_test_user(&app).await;

    let response = app
        .post(
            "/api/chat",
            Some(&owner.token),
            json!({ "message": "Private", "sessionId": "owned" }),
        )
        .await;
    crate::assert_status!(response, StatusCode::OK);

    let read = app.get("/api/chat/owned", Some(&other.token)).await;
    crate::assert_error_body!(read, StatusCode::NOT_FOUND);

    let write = app
        .post(
            "/api/chat",
            Some(&other.token),
            json!({ "message": "Hijack", "sessionId": "owned" }),
        )
        .await;
    crate::assert_error_body!(write, StatusCode::CONFLICT);

    // The owner's transcript is untouched
    let transcript = app.get("/api/chat/owned", Some(&owner.token)).await;
    assert_eq!(transcript.body["messages"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unknown_transcript_is_not_found() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app).await;

    let response = app.get("/api/chat/never-used", Some(&user.token)).await;
    crate::assert_error_body!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chat_validation() {
    let app = TestApp::new();
    let user = create_unique_test_user(&app).await;

    let empty = app
        .post("/api/chat", Some(&user.token), json!({ "message": "   " }))
        .await;
    crate::assert_error_body!(empty, StatusCode::BAD_REQUEST);

    let bad_session = app
        .post(
            "/api/chat",
            Some(&user.token),
            json!({ "message": "hi", "sessionId": "has space" }),
        )
        .await;
    crate::assert_error_body!(bad_session, StatusCode::BAD_REQUEST);

    assert_eq!(app.responder.as_ref().unwrap().calls(), 0);
}

#[tokio::test]
async fn test_chat_requires_token() {
    let app = TestApp::new();

    let response = app.post("/api/chat", None, json!({ "message": "hi" })).await;
    crate::assert_error_body!(response, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_chat_unavailable_without_responder() {
    let app = TestApp::without_responder();
    let user = create_unique_test_user(&app).await;

    let response = app
        .post("/api/chat", Some(&user.token), json!({ "message": "hi" }))
        .await;
    crate::assert_error_body!(response, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_responder_failure_is_bad_gateway_and_not_stored() {
    let app = TestApp::with_responder(StubResponder::failing());
    let user = create_unique_test_user(&app).await;

    let response = app
        .post(
            "/api/chat",
            Some(&user.token),
            json!({ "message": "hi", "sessionId": "broken" }),
        )
        .await;
    crate::assert_error_body!(response, StatusCode::BAD_GATEWAY);

    let transcript = app.get("/api/chat/broken", Some(&user.token)).await;
    crate::assert_status!(transcript, StatusCode::NOT_FOUND);
}
