/**
 * Store Records
 *
 * Logical shapes of the documents kept in the store. The Postgres backend
 * maps them to tables (see `migrations/`), the memory backend keeps them in
 * plain collections.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user
///
/// `password_hash` always holds a bcrypt hash. It is skipped during
/// serialization and redacted from `Debug` output.
#[derive(Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserAccount {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAccount")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("name", &self.name)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Fields supplied when creating a user
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
}

impl NewUser {
    /// Materialize the account with a fresh id and timestamps
    pub fn into_account(self, now: DateTime<Utc>) -> UserAccount {
        UserAccount {
            id: Uuid::new_v4(),
            email: self.email,
            password_hash: self.password_hash,
            name: self.name,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Author of a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of a chat transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// An append-only chat transcript keyed by session id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTranscript {
    pub session_id: String,
    pub user_id: Uuid,
    pub messages: Vec<TranscriptMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A saved career assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub answers: serde_json::Value,
    pub career_path: String,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when saving an assessment
#[derive(Debug, Clone)]
pub struct NewAssessment {
    pub user_id: Uuid,
    pub answers: serde_json::Value,
    pub career_path: String,
}

impl NewAssessment {
    pub fn into_assessment(self, now: DateTime<Utc>) -> Assessment {
        Assessment {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            answers: self.answers,
            career_path: self.career_path,
            timestamp: now,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A learning resource the user opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LearningProgress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resource_id: String,
    pub resource_type: String,
    pub title: String,
    pub url: Option<String>,
    pub completed: bool,
    pub viewed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when recording progress
#[derive(Debug, Clone)]
pub struct NewProgress {
    pub user_id: Uuid,
    pub resource_id: String,
    pub resource_type: String,
    pub title: String,
    pub url: Option<String>,
    pub completed: bool,
}

impl NewProgress {
    pub fn into_progress(self, now: DateTime<Utc>) -> LearningProgress {
        LearningProgress {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            resource_id: self.resource_id,
            resource_type: self.resource_type,
            title: self.title,
            url: self.url,
            completed: self.completed,
            viewed_at: now,
            updated_at: now,
        }
    }
}

/// Per-user collections that can be counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Assessments,
    ChatSessions,
    LearningProgress,
}

impl RecordKind {
    /// Backing table name
    pub fn table(self) -> &'static str {
        match self {
            Self::Assessments => "assessments",
            Self::ChatSessions => "chat_sessions",
            Self::LearningProgress => "learning_progress",
        }
    }
}
