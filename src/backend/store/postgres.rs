/**
 * PostgreSQL Store Backend
 *
 * Selected with a `postgres://` connection string. The shared connection is
 * a sqlx `PgPool`; migrations from `migrations/` are applied every time a
 * pool is opened.
 *
 * Uniqueness is enforced by the schema (`users.email UNIQUE`,
 * `chat_sessions.session_id PRIMARY KEY`). A unique violation on insert is
 * reported as `StoreError::Conflict`, which makes the database the
 * authoritative duplicate guard.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::types::Json;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::backend::store::{
    Assessment, ChatTranscript, Connector, DocumentStore, LearningProgress, NewAssessment,
    NewProgress, NewUser, RecordKind, SharedConnection, StoreError, StoreResult,
    TranscriptMessage, UserAccount,
};
use crate::shared::config::redact_url;

const MAX_POOL_CONNECTIONS: u32 = 10;

/// Opens sqlx pools against a Postgres server
pub struct PgConnector {
    url: String,
    database: Option<String>,
}

impl PgConnector {
    /// # Arguments
    ///
    /// * `url` - `postgres://` connection string
    /// * `database` - Database name overriding the one in `url`
    pub fn new(url: impl Into<String>, database: Option<String>) -> Self {
        Self {
            url: url.into(),
            database,
        }
    }
}

#[async_trait]
impl Connector for PgConnector {
    async fn connect(&self) -> StoreResult<SharedConnection> {
        let mut options = PgConnectOptions::from_str(&self.url)
            .map_err(|e| StoreError::Connection(format!("invalid connection string: {}", e)))?;
        if let Some(database) = &self.database {
            options = options.database(database);
        }

        let pool = PgPoolOptions::new()
            .max_connections(MAX_POOL_CONNECTIONS)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        tracing::info!("Running database migrations...");
        if let Err(e) = sqlx::migrate!().run(&pool).await {
            tracing::error!("Failed to run database migrations: {}", e);
            pool.close().await;
            return Err(migration_failed(e));
        }
        tracing::info!("Database migrations completed successfully");

        Ok(Arc::new(PgStore::new(pool)))
    }

    fn describe(&self) -> String {
        match &self.database {
            Some(database) => format!("{} (database {})", redact_url(&self.url), database),
            None => redact_url(&self.url),
        }
    }
}

/// Store operations over a `PgPool`
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TranscriptRow {
    session_id: String,
    user_id: Uuid,
    messages: Json<Vec<TranscriptMessage>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TranscriptRow> for ChatTranscript {
    fn from(row: TranscriptRow) -> Self {
        ChatTranscript {
            session_id: row.session_id,
            user_id: row.user_id,
            messages: row.messages.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A pool whose schema could not be brought up to date is not handed out,
/// so the manager returns to `Uninitialized` and the next call retries
fn migration_failed(err: impl std::fmt::Display) -> StoreError {
    StoreError::Connection(format!("migrations failed: {}", err))
}

/// Map an insert failure, turning unique violations into `Conflict`
fn map_write_error(err: sqlx::Error, conflict: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::Conflict(conflict.to_string());
        }
    }
    StoreError::backend(err)
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<UserAccount> {
        let account = user.into_account(Utc::now());

        sqlx::query_as::<_, UserAccount>(
            r#"
            INSERT INTO users (id, email, password_hash, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, password_hash, name, created_at, updated_at
            "#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.name)
        .bind(account.created_at)
        .bind(account.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "email already registered"))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserAccount>> {
        sqlx::query_as::<_, UserAccount>(
            r#"
            SELECT id, email, password_hash, name, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<UserAccount>> {
        sqlx::query_as::<_, UserAccount>(
            r#"
            SELECT id, email, password_hash, name, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)
    }

    async fn upsert_transcript(
        &self,
        session_id: &str,
        user_id: Uuid,
        messages: &[TranscriptMessage],
    ) -> StoreResult<ChatTranscript> {
        // The WHERE on the update arm leaves another user's session untouched
        // and returns no row.
        let row = sqlx::query_as::<_, TranscriptRow>(
            r#"
            INSERT INTO chat_sessions (session_id, user_id, messages, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (session_id) DO UPDATE SET
                messages = chat_sessions.messages || EXCLUDED.messages,
                updated_at = EXCLUDED.updated_at
            WHERE chat_sessions.user_id = EXCLUDED.user_id
            RETURNING session_id, user_id, messages, created_at, updated_at
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .bind(Json(messages.to_vec()))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        row.map(ChatTranscript::from)
            .ok_or_else(|| StoreError::Conflict("session belongs to another user".to_string()))
    }

    async fn find_transcript(&self, session_id: &str) -> StoreResult<Option<ChatTranscript>> {
        let row = sqlx::query_as::<_, TranscriptRow>(
            r#"
            SELECT session_id, user_id, messages, created_at, updated_at
            FROM chat_sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(row.map(ChatTranscript::from))
    }

    async fn insert_assessment(&self, assessment: NewAssessment) -> StoreResult<Assessment> {
        let assessment = assessment.into_assessment(Utc::now());

        sqlx::query_as::<_, Assessment>(
            r#"
            INSERT INTO assessments (id, user_id, answers, career_path, "timestamp", created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, answers, career_path, "timestamp", created_at, updated_at
            "#,
        )
        .bind(assessment.id)
        .bind(assessment.user_id)
        .bind(&assessment.answers)
        .bind(&assessment.career_path)
        .bind(assessment.timestamp)
        .bind(assessment.created_at)
        .bind(assessment.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::backend)
    }

    async fn latest_assessment(&self, user_id: Uuid) -> StoreResult<Option<Assessment>> {
        sqlx::query_as::<_, Assessment>(
            r#"
            SELECT id, user_id, answers, career_path, "timestamp", created_at, updated_at
            FROM assessments
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)
    }

    async fn record_progress(&self, progress: NewProgress) -> StoreResult<LearningProgress> {
        let progress = progress.into_progress(Utc::now());

        sqlx::query_as::<_, LearningProgress>(
            r#"
            INSERT INTO learning_progress
                (id, user_id, resource_id, resource_type, title, url, completed, viewed_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, user_id, resource_id, resource_type, title, url, completed, viewed_at, updated_at
            "#,
        )
        .bind(progress.id)
        .bind(progress.user_id)
        .bind(&progress.resource_id)
        .bind(&progress.resource_type)
        .bind(&progress.title)
        .bind(&progress.url)
        .bind(progress.completed)
        .bind(progress.viewed_at)
        .bind(progress.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::backend)
    }

    async fn count_by_user(&self, kind: RecordKind, user_id: Uuid) -> StoreResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE user_id = $1", kind.table());

        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        Ok(count.max(0) as u64)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
