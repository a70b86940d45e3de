/**
 * In-Memory Store Backend
 *
 * Selected with a `memory://` connection string. Data lives in the
 * connector, so closing and reopening the connection keeps it, but it is
 * lost when the process exits. Useful for local development and for tests,
 * where connect latency, operation latency and connect failures can be
 * injected.
 */

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use uuid::Uuid;

use crate::backend::store::{
    Assessment, ChatTranscript, Connector, DocumentStore, LearningProgress, NewAssessment,
    NewProgress, NewUser, RecordKind, SharedConnection, StoreError, StoreResult,
    TranscriptMessage, UserAccount,
};

#[derive(Default)]
struct MemoryData {
    users: HashMap<Uuid, UserAccount>,
    emails: HashMap<String, Uuid>,
    transcripts: HashMap<String, ChatTranscript>,
    assessments: Vec<Assessment>,
    progress: Vec<LearningProgress>,
}

/// Opens [`MemoryStore`] handles over one shared data set
pub struct MemoryConnector {
    data: Arc<Mutex<MemoryData>>,
    latency_ms: Arc<AtomicU64>,
    closes: Arc<AtomicUsize>,
    connect_delay: Duration,
    connects: AtomicUsize,
    pending_failures: AtomicUsize,
}

impl Default for MemoryConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(MemoryData::default())),
            latency_ms: Arc::new(AtomicU64::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
            connect_delay: Duration::ZERO,
            connects: AtomicUsize::new(0),
            pending_failures: AtomicUsize::new(0),
        }
    }

    /// Delay every connection attempt
    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = delay;
        self
    }

    /// Make the next `n` connection attempts fail
    pub fn fail_next_connects(&self, n: usize) {
        self.pending_failures.store(n, Ordering::SeqCst);
    }

    /// Delay every store operation, including on already open handles
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Successful connections opened so far
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Handles closed so far
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self) -> StoreResult<SharedConnection> {
        if !self.connect_delay.is_zero() {
            tokio::time::sleep(self.connect_delay).await;
        }

        let failed = self
            .pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(StoreError::Connection("memory store unavailable".to_string()));
        }

        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MemoryStore {
            data: self.data.clone(),
            latency_ms: self.latency_ms.clone(),
            closes: self.closes.clone(),
        }))
    }

    fn describe(&self) -> String {
        "memory://".to_string()
    }
}

/// A handle onto the in-memory data set
pub struct MemoryStore {
    data: Arc<Mutex<MemoryData>>,
    latency_ms: Arc<AtomicU64>,
    closes: Arc<AtomicUsize>,
}

impl MemoryStore {
    async fn simulate_latency(&self) {
        let ms = self.latency_ms.load(Ordering::SeqCst);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<UserAccount> {
        self.simulate_latency().await;
        let mut data = self.lock();

        if data.emails.contains_key(&user.email) {
            return Err(StoreError::Conflict("email already registered".to_string()));
        }

        let account = user.into_account(Utc::now());
        data.emails.insert(account.email.clone(), account.id);
        data.users.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserAccount>> {
        self.simulate_latency().await;
        let data = self.lock();
        Ok(data
            .emails
            .get(email)
            .and_then(|id| data.users.get(id))
            .cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<UserAccount>> {
        self.simulate_latency().await;
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn upsert_transcript(
        &self,
        session_id: &str,
        user_id: Uuid,
        messages: &[TranscriptMessage],
    ) -> StoreResult<ChatTranscript> {
        self.simulate_latency().await;
        let mut data = self.lock();
        let now = Utc::now();

        let transcript = data
            .transcripts
            .entry(session_id.to_string())
            .or_insert_with(|| ChatTranscript {
                session_id: session_id.to_string(),
                user_id,
                messages: Vec::new(),
                created_at: now,
                updated_at: now,
            });

        if transcript.user_id != user_id {
            return Err(StoreError::Conflict(
                "session belongs to another user".to_string(),
            ));
        }

        transcript.messages.extend_from_slice(messages);
        transcript.updated_at = now;
        Ok(transcript.clone())
    }

    async fn find_transcript(&self, session_id: &str) -> StoreResult<Option<ChatTranscript>> {
        self.simulate_latency().await;
        Ok(self.lock().transcripts.get(session_id).cloned())
    }

    async fn insert_assessment(&self, assessment: NewAssessment) -> StoreResult<Assessment> {
        self.simulate_latency().await;
        let assessment = assessment.into_assessment(Utc::now());
        self.lock().assessments.push(assessment.clone());
        Ok(assessment)
    }

    async fn latest_assessment(&self, user_id: Uuid) -> StoreResult<Option<Assessment>> {
        self.simulate_latency().await;
        Ok(self
            .lock()
            .assessments
            .iter()
            .filter(|a| a.user_id == user_id)
            .max_by_key(|a| a.created_at)
            .cloned())
    }

    async fn record_progress(&self, progress: NewProgress) -> StoreResult<LearningProgress> {
        self.simulate_latency().await;
        let progress = progress.into_progress(Utc::now());
        self.lock().progress.push(progress.clone());
        Ok(progress)
    }

    async fn count_by_user(&self, kind: RecordKind, user_id: Uuid) -> StoreResult<u64> {
        self.simulate_latency().await;
        let data = self.lock();
        let count = match kind {
            RecordKind::Assessments => data.assessments.iter().filter(|a| a.user_id == user_id).count(),
            RecordKind::ChatSessions => data.transcripts.values().filter(|t| t.user_id == user_id).count(),
            RecordKind::LearningProgress => data.progress.iter().filter(|p| p.user_id == user_id).count(),
        };
        Ok(count as u64)
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
