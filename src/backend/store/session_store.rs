/**
 * Session Store
 *
 * The store API used by the auth flows and HTTP handlers. Each call fetches
 * the shared connection from the `ConnectionManager` and runs exactly one
 * backend operation under the operation deadline.
 *
 * Connection establishment has its own (connect) deadline inside the
 * manager, so a cold first request may wait for both.
 */

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::backend::store::{
    Assessment, ChatTranscript, ConnectionManager, LearningProgress, NewAssessment, NewProgress,
    NewUser, RecordKind, SharedConnection, StoreError, StoreResult, TranscriptMessage,
    UserAccount,
};
use crate::backend::timeout::with_deadline;

/// Deadline-bounded access to users and session artifacts
#[derive(Clone)]
pub struct SessionStore {
    manager: Arc<ConnectionManager>,
    operation_timeout: Duration,
}

impl SessionStore {
    pub fn new(manager: Arc<ConnectionManager>, operation_timeout: Duration) -> Self {
        Self {
            manager,
            operation_timeout,
        }
    }

    /// Run one store operation on the shared connection, bounded by the
    /// operation deadline
    async fn run<T, F, Fut>(&self, name: &'static str, op: F) -> StoreResult<T>
    where
        F: FnOnce(SharedConnection) -> Fut,
        Fut: Future<Output = StoreResult<T>>,
    {
        let conn = self.manager.get_connection().await?;

        match with_deadline(op(conn), self.operation_timeout).await {
            Ok(result) => result,
            Err(elapsed) => {
                tracing::warn!("Store operation {} timed out after {:?}", name, elapsed.after);
                Err(StoreError::OperationTimeout(elapsed.after))
            }
        }
    }

    /// Create a user account
    ///
    /// # Arguments
    ///
    /// * `email` - Normalized email address (unique key)
    /// * `password_hash` - bcrypt hash, never a plaintext password
    /// * `name` - Optional display name
    ///
    /// # Returns
    ///
    /// The stored account, or `StoreError::Conflict` if the email is taken.
    /// The existence check only short-circuits the common case; two racing
    /// sign-ups are settled by the store's uniqueness constraint.
    pub async fn create_user(
        &self,
        email: &str,
        password_hash: String,
        name: Option<String>,
    ) -> StoreResult<UserAccount> {
        if self.find_user_by_email(email).await?.is_some() {
            tracing::debug!("Sign-up rejected, email already registered");
            return Err(StoreError::Conflict("email already registered".to_string()));
        }

        let user = NewUser {
            email: email.to_string(),
            password_hash,
            name,
        };
        self.run("insert_user", |conn| async move { conn.insert_user(user).await })
            .await
    }

    pub async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserAccount>> {
        self.run("find_user_by_email", |conn| async move {
            conn.find_user_by_email(email).await
        })
        .await
    }

    pub async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<UserAccount>> {
        self.run("find_user_by_id", |conn| async move { conn.find_user_by_id(id).await })
            .await
    }

    /// Append messages to a transcript, creating it on first use
    ///
    /// Re-submitting a session id merges into the existing transcript;
    /// messages keep the order given here.
    pub async fn upsert_transcript(
        &self,
        session_id: &str,
        user_id: Uuid,
        messages: &[TranscriptMessage],
    ) -> StoreResult<ChatTranscript> {
        self.run("upsert_transcript", |conn| async move {
            conn.upsert_transcript(session_id, user_id, messages).await
        })
        .await
    }

    pub async fn find_transcript(&self, session_id: &str) -> StoreResult<Option<ChatTranscript>> {
        self.run("find_transcript", |conn| async move {
            conn.find_transcript(session_id).await
        })
        .await
    }

    pub async fn insert_assessment(&self, assessment: NewAssessment) -> StoreResult<Assessment> {
        self.run("insert_assessment", |conn| async move {
            conn.insert_assessment(assessment).await
        })
        .await
    }

    pub async fn latest_assessment(&self, user_id: Uuid) -> StoreResult<Option<Assessment>> {
        self.run("latest_assessment", |conn| async move {
            conn.latest_assessment(user_id).await
        })
        .await
    }

    pub async fn record_progress(&self, progress: NewProgress) -> StoreResult<LearningProgress> {
        self.run("record_progress", |conn| async move {
            conn.record_progress(progress).await
        })
        .await
    }

    pub async fn count_by_user(&self, kind: RecordKind, user_id: Uuid) -> StoreResult<u64> {
        self.run("count_by_user", |conn| async move {
            conn.count_by_user(kind, user_id).await
        })
        .await
    }
}
