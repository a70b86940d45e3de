/**
 * Assistant Responder
 *
 * The seam to the external text-generation service. `GeminiResponder`
 * calls the Gemini `generateContent` REST endpoint with a career counselor
 * persona; tests substitute their own `Responder`.
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::backend::store::Role;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Returned when the service answers without any candidate text
pub const FALLBACK_REPLY: &str = "I'm sorry, I couldn't generate a response. Please try again.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const SYSTEM_PROMPT: &str = "You are an AI career counselor with expertise in helping people \
discover their ideal career paths. You should:

1. Ask thoughtful questions about their interests, skills, values, and goals
2. Provide personalized career recommendations based on their responses
3. Suggest specific learning paths and resources
4. Offer practical advice on skill development and career transitions
5. Be encouraging and supportive while being realistic about career prospects
6. Focus on actionable guidance they can implement

Keep your responses conversational, helpful, and focused on career development. \
Ask follow-up questions to better understand their situation.";

#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("service returned status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Decode(String),
}

/// One prior turn of the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

/// Produces the assistant's reply to a message
#[async_trait]
pub trait Responder: Send + Sync {
    async fn reply(&self, history: &[ChatTurn], message: &str) -> Result<String, ResponderError>;
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_k: u32,
    top_p: f64,
    max_output_tokens: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.is_empty())
    }
}

fn gemini_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

/// Gemini `generateContent` client
pub struct GeminiResponder {
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

impl GeminiResponder {
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key
    /// * `model` - Model name, e.g. `gemini-pro`
    /// * `base_url` - Service root; defaults to the public Google endpoint
    pub fn new(api_key: impl Into<String>, model: &str, base_url: Option<&str>) -> Self {
        let base = base_url.unwrap_or(DEFAULT_GEMINI_BASE_URL).trim_end_matches('/');
        Self {
            api_key: api_key.into(),
            endpoint: format!("{}/v1beta/models/{}:generateContent", base, model),
            client: reqwest::Client::new(),
        }
    }

    fn build_request<'a>(history: &'a [ChatTurn], message: &'a str) -> GenerateRequest<'a> {
        let mut contents = Vec::with_capacity(history.len() + 2);
        contents.push(Content {
            role: "model",
            parts: vec![Part { text: SYSTEM_PROMPT }],
        });
        contents.extend(history.iter().map(|turn| Content {
            role: gemini_role(turn.role),
            parts: vec![Part { text: &turn.text }],
        }));
        contents.push(Content {
            role: "user",
            parts: vec![Part { text: message }],
        });

        GenerateRequest {
            contents,
            generation_config: GenerationConfig {
                temperature: 0.7,
                top_k: 40,
                top_p: 0.95,
                max_output_tokens: 1024,
            },
        }
    }
}

#[async_trait]
impl Responder for GeminiResponder {
    async fn reply(&self, history: &[ChatTurn], message: &str) -> Result<String, ResponderError> {
        let payload = Self::build_request(history, message);

        let resp = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| ResponderError::Request(e.without_url().to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            tracing::error!("Gemini API error: {}", status);
            return Err(ResponderError::Status(status));
        }

        let body: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| ResponderError::Decode(e.without_url().to_string()))?;

        Ok(body.first_text().unwrap_or_else(|| {
            tracing::warn!("Gemini returned no candidate text");
            FALLBACK_REPLY.to_string()
        }))
    }
}
