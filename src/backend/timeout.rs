/**
 * Deadline Guard
 *
 * Races a future against a timer. Used to bound both establishing the store
 * connection and every individual store operation, since the store is an
 * external network service with no built-in bound.
 *
 * When the deadline fires first the operation future is dropped. That
 * cancels our wait, not necessarily the remote call: a write that was
 * already sent may still land. Callers treat a timeout as "outcome unknown".
 */

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// The deadline elapsed before the operation completed
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("deadline of {after:?} elapsed")]
pub struct TimedOut {
    pub after: Duration,
}

/// Run `operation`, giving up after `duration`
///
/// Returns the operation's own output (which may itself be a `Result`) or
/// [`TimedOut`]. On timeout the operation is dropped and never polled again.
pub async fn with_deadline<F>(operation: F, duration: Duration) -> Result<F::Output, TimedOut>
where
    F: Future,
{
    tokio::time::timeout(duration, operation)
        .await
        .map_err(|_| TimedOut { after: duration })
}

/// Connection and per-operation deadlines for the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadlines {
    pub connect: Duration,
    pub operation: Duration,
}

impl From<&crate::shared::AppConfig> for Deadlines {
    fn from(config: &crate::shared::AppConfig) -> Self {
        Self {
            connect: config.connect_timeout,
            operation: config.operation_timeout,
        }
    }
}
