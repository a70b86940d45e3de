//! Store Module
//!
//! Persistence for user accounts and per-user session artifacts. All access
//! goes through one lazily created, process-wide connection handed out by
//! [`ConnectionManager`], and every operation is bounded by a deadline.
//!
//! # Module Structure
//!
//! ```text
//! store/
//! ├── mod.rs            - DocumentStore trait and StoreError
//! ├── models.rs         - Record types
//! ├── connection.rs     - ConnectionManager and Connector
//! ├── session_store.rs  - Deadline-bounded operations used by handlers
//! ├── postgres.rs       - sqlx/Postgres backend
//! └── memory.rs         - In-process backend (memory://)
//! ```
//!
//! # Concurrency
//!
//! Every write touches a single document/row. Transcript appends are a
//! single atomic insert-or-append, so concurrent exchanges on one session
//! both land; ordering between them is whichever commits last.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

pub mod models;
pub mod connection;
pub mod session_store;
pub mod postgres;
pub mod memory;

pub use connection::{ConnectionManager, ConnectionState, Connector};
pub use models::{
    Assessment, ChatTranscript, LearningProgress, NewAssessment, NewProgress, NewUser,
    RecordKind, Role, TranscriptMessage, UserAccount,
};
pub use session_store::SessionStore;

/// Errors surfaced by the store layer
///
/// `Clone` so a single connect outcome can be handed to every task awaiting
/// the shared in-flight connection attempt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness or ownership constraint rejected the write
    #[error("conflict: {0}")]
    Conflict(String),

    /// The connection could not be established within the deadline
    #[error("store connection timed out after {0:?}")]
    ConnectionTimeout(Duration),

    /// An operation did not complete within the deadline
    #[error("store operation timed out after {0:?}")]
    OperationTimeout(Duration),

    /// Establishing the connection failed
    #[error("store connection failed: {0}")]
    Connection(String),

    /// The store reported an error
    #[error("store error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }

    /// Timeouts may be retried; conflicts and backend errors may not
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ConnectionTimeout(_) | Self::OperationTimeout(_) | Self::Connection(_)
        )
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The live handle shared by every store operation
pub type SharedConnection = Arc<dyn DocumentStore>;

/// Operations the auth/session core needs from the backing store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a user; a duplicate email is `Conflict`
    async fn insert_user(&self, user: NewUser) -> StoreResult<UserAccount>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserAccount>>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<UserAccount>>;

    /// Append to the transcript for `session_id`, creating it if absent
    ///
    /// Must be a single atomic insert-or-append. A transcript owned by a
    /// different user is `Conflict`.
    async fn upsert_transcript(
        &self,
        session_id: &str,
        user_id: Uuid,
        messages: &[TranscriptMessage],
    ) -> StoreResult<ChatTranscript>;

    async fn find_transcript(&self, session_id: &str) -> StoreResult<Option<ChatTranscript>>;

    async fn insert_assessment(&self, assessment: NewAssessment) -> StoreResult<Assessment>;

    /// Most recently created assessment for the user
    async fn latest_assessment(&self, user_id: Uuid) -> StoreResult<Option<Assessment>>;

    async fn record_progress(&self, progress: NewProgress) -> StoreResult<LearningProgress>;

    async fn count_by_user(&self, kind: RecordKind, user_id: Uuid) -> StoreResult<u64>;

    /// Release the underlying resources
    async fn close(&self);
}
