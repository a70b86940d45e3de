/**
 * Chat Handlers
 *
 * POST /api/chat        - one exchange with the career counselor
 * GET  /api/chat/{id}   - the caller's transcript for a session
 *
 * Each exchange appends the user message and then the assistant reply to
 * the session transcript in one atomic upsert. A request without a
 * `sessionId` starts a new session.
 */

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::chat::responder::ChatTurn;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{AuthUser, JsonBody};
use crate::backend::server::state::AppState;
use crate::backend::store::{ChatTranscript, Role, TranscriptMessage};
use crate::shared::SharedError;

const MAX_SESSION_ID_LEN: usize = 128;
const MAX_MESSAGE_LEN: usize = 10_000;

/// One entry of `conversationHistory`
///
/// Accepts both `{role, content}` and the `{role, parts: [{text}]}` shape
/// used by the text-generation API.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct HistoryEntry {
    pub role: String,
    pub content: Option<String>,
    pub parts: Vec<HistoryPart>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct HistoryPart {
    pub text: String,
}

impl HistoryEntry {
    fn into_turn(self) -> Result<ChatTurn, SharedError> {
        let role = match self.role.as_str() {
            "user" => Role::User,
            "assistant" | "model" => Role::Assistant,
            _ => {
                return Err(SharedError::validation(
                    "conversationHistory",
                    "Unknown message role",
                ))
            }
        };
        let text = match self.content {
            Some(content) => content,
            None => self
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("\n"),
        };
        Ok(ChatTurn { role, text })
    }
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub conversation_history: Vec<HistoryEntry>,
    pub session_id: Option<String>,
}

/// A validated chat request
#[derive(Debug)]
pub struct ChatInput {
    pub message: String,
    pub history: Vec<ChatTurn>,
    pub session_id: String,
}

impl ChatRequest {
    pub fn validate(self) -> Result<ChatInput, SharedError> {
        let message = self.message.trim().to_string();
        if message.is_empty() {
            return Err(SharedError::validation("message", "Message is required"));
        }
        if message.chars().count() > MAX_MESSAGE_LEN {
            return Err(SharedError::validation("message", "Message is too long"));
        }

        let session_id = match self.session_id {
            Some(id) => validate_session_id(&id)?,
            None => Uuid::new_v4().to_string(),
        };

        let history = self
            .conversation_history
            .into_iter()
            .map(HistoryEntry::into_turn)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ChatInput {
            message,
            history,
            session_id,
        })
    }
}

/// Session ids are client supplied: 1..=128 characters, no whitespace or
/// control characters
pub fn validate_session_id(raw: &str) -> Result<String, SharedError> {
    let len = raw.chars().count();
    if len == 0 || len > MAX_SESSION_ID_LEN {
        return Err(SharedError::validation(
            "sessionId",
            "Session id must be 1-128 characters",
        ));
    }
    if raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(SharedError::validation("sessionId", "Invalid session id"));
    }
    Ok(raw.to_string())
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
}

/// POST /api/chat
///
/// # Errors
///
/// * `400` - empty message, bad session id or history
/// * `409` - the session belongs to another user
/// * `502` - the text-generation service failed
/// * `503` - no text-generation service configured
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    JsonBody(request): JsonBody<ChatRequest>,
) -> BackendResult<Json<ChatResponse>> {
    let input = request.validate()?;

    let responder = state.responder.as_ref().ok_or_else(|| {
        tracing::error!("Chat requested but GEMINI_API_KEY is not configured");
        BackendError::unavailable("Chat is not configured")
    })?;

    let user_message = TranscriptMessage::new(Role::User, input.message.clone());
    let reply = responder.reply(&input.history, &input.message).await?;
    let assistant_message = TranscriptMessage::new(Role::Assistant, reply.clone());

    let transcript = state
        .store
        .upsert_transcript(&input.session_id, identity.id, &[user_message, assistant_message])
        .await?;
    tracing::debug!(
        "Session {} now has {} messages",
        transcript.session_id,
        transcript.messages.len()
    );

    Ok(Json(ChatResponse {
        response: reply,
        session_id: input.session_id,
    }))
}

/// GET /api/chat/{session_id}
///
/// Another user's session is reported as not found.
pub async fn get_transcript(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(session_id): Path<String>,
) -> BackendResult<Json<ChatTranscript>> {
    let session_id = validate_session_id(&session_id)?;

    state
        .store
        .find_transcript(&session_id)
        .await?
        .filter(|t| t.user_id == identity.id)
        .map(Json)
        .ok_or_else(|| BackendError::not_found("Chat session not found"))
}
