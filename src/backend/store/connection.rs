/**
 * Shared Store Connection
 *
 * `ConnectionManager` owns the single process-wide handle to the backing
 * store. The handle is created lazily on first use and reused by every
 * later operation.
 *
 * # State Machine
 *
 * ```text
 * Uninitialized --get_connection--> Connecting --ok--> Ready
 *       ^                               |                 |
 *       +------------- error/timeout ---+                 |
 *       +------------------------ close ------------------+
 * ```
 *
 * While `Connecting`, the slot holds one `Shared` connect future. Every
 * task that arrives before it resolves awaits a clone of that same future,
 * so interleaved first callers produce exactly one connection attempt. A
 * failed attempt resets the slot to `Uninitialized` instead of caching a
 * dead handle.
 *
 * The slot lock is a plain `std::sync::Mutex` held only to read or swap
 * the state, never across an `.await`.
 */

use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::backend::store::{SharedConnection, StoreError, StoreResult};
use crate::backend::timeout::with_deadline;

/// Opens new handles to a particular store backend
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Establish a fresh connection
    async fn connect(&self) -> StoreResult<SharedConnection>;

    /// Target description for logs (no credentials)
    fn describe(&self) -> String;
}

/// Observable lifecycle state of the shared connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Uninitialized,
    Connecting,
    Ready,
}

type PendingConnect = Shared<BoxFuture<'static, StoreResult<SharedConnection>>>;

enum Slot {
    Uninitialized,
    Connecting { attempt: u64, pending: PendingConnect },
    Ready(SharedConnection),
}

/// Lazily created, process-wide store connection
pub struct ConnectionManager {
    connector: Arc<dyn Connector>,
    connect_timeout: Duration,
    slot: Mutex<Slot>,
    attempts: AtomicU64,
}

impl ConnectionManager {
    /// Create a manager; no connection is opened until first use
    pub fn new(connector: Arc<dyn Connector>, connect_timeout: Duration) -> Self {
        Self {
            connector,
            connect_timeout,
            slot: Mutex::new(Slot::Uninitialized),
            attempts: AtomicU64::new(0),
        }
    }

    /// Return the shared connection, establishing it if needed
    ///
    /// # Errors
    ///
    /// * `StoreError::ConnectionTimeout` - the attempt exceeded the connect deadline
    /// * `StoreError::Connection` - the backend refused the connection
    ///
    /// Either way the manager is back to `Uninitialized` and the next call
    /// starts a new attempt.
    pub async fn get_connection(&self) -> StoreResult<SharedConnection> {
        let (attempt, pending) = {
            let mut slot = self.lock_slot();
            match &*slot {
                Slot::Ready(conn) => return Ok(conn.clone()),
                Slot::Connecting { attempt, pending } => (*attempt, pending.clone()),
                Slot::Uninitialized => {
                    let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    let pending = self.start_connect(attempt);
                    *slot = Slot::Connecting {
                        attempt,
                        pending: pending.clone(),
                    };
                    (attempt, pending)
                }
            }
        };

        let outcome = pending.await;

        let mut slot = self.lock_slot();
        let is_current = matches!(&*slot, Slot::Connecting { attempt: current, .. } if *current == attempt);
        if is_current {
            *slot = match &outcome {
                Ok(conn) => Slot::Ready(conn.clone()),
                Err(_) => Slot::Uninitialized,
            };
        }
        outcome
    }

    /// Release the shared connection and reset to `Uninitialized`
    ///
    /// Idempotent. An attempt still in flight is abandoned: its waiters get
    /// its result, the handle is not installed, and `close` waits for it
    /// and closes it.
    pub async fn close(&self) {
        let previous = {
            let mut slot = self.lock_slot();
            std::mem::replace(&mut *slot, Slot::Uninitialized)
        };

        match previous {
            Slot::Ready(conn) => {
                conn.close().await;
                tracing::info!("Store connection closed");
            }
            Slot::Connecting { attempt, pending } => {
                tracing::warn!("Store connection attempt {} abandoned by close", attempt);
                if let Ok(conn) = pending.await {
                    conn.close().await;
                    tracing::info!("Abandoned store connection {} closed", attempt);
                }
            }
            Slot::Uninitialized => {
                tracing::debug!("Store connection already closed");
            }
        }
    }

    pub fn state(&self) -> ConnectionState {
        match &*self.lock_slot() {
            Slot::Uninitialized => ConnectionState::Uninitialized,
            Slot::Connecting { .. } => ConnectionState::Connecting,
            Slot::Ready(_) => ConnectionState::Ready,
        }
    }

    /// Number of connection attempts started so far
    pub fn connect_attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    fn start_connect(&self, attempt: u64) -> PendingConnect {
        let connector = self.connector.clone();
        let deadline = self.connect_timeout;

        async move {
            let target = connector.describe();
            tracing::info!("Connecting to store {} (attempt {})", target, attempt);

            match with_deadline(connector.connect(), deadline).await {
                Ok(Ok(conn)) => {
                    tracing::info!("Store connection established: {}", target);
                    Ok(conn)
                }
                Ok(Err(e)) => {
                    tracing::error!("Store connection failed: {}", e);
                    Err(e)
                }
                Err(elapsed) => {
                    tracing::error!("Store connection timed out after {:?}", elapsed.after);
                    Err(StoreError::ConnectionTimeout(elapsed.after))
                }
            }
        }
        .boxed()
        .shared()
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
