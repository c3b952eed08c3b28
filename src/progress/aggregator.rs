use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio::time::Instant;

use super::types::{ErrorEntry, ProgressCounts, ProgressState};

#[derive(Debug, Default)]
struct Inner {
    attempted: u64,
    succeeded: u64,
    failed: u64,
    errors: Vec<ErrorEntry>,
    last_error_at: Option<DateTime<Utc>>,
}

/// Counters and error log shared by every worker of one run.
///
/// All state sits behind a single mutex so a snapshot never observes
/// `attempted` out of step with `succeeded + failed`, or a failure counted
/// without its log entry. The lock is never held across an `.await`.
#[derive(Debug)]
pub struct ProgressAggregator {
    started_at: Instant,
    inner: Mutex<Inner>,
}

impl Default for ProgressAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn record_success(&self) {
        let mut inner = self.lock();
        inner.attempted = inner.attempted.saturating_add(1);
        inner.succeeded = inner.succeeded.saturating_add(1);
    }

    /// Counts a failed attempt and appends it to the error log.
    ///
    /// Returns the entry as stored so callers can stream it.
    pub fn record_failure(&self, message: impl Into<String>) -> ErrorEntry {
        let message = message.into();
        let mut inner = self.lock();
        // Wall clock may step backwards; the log must not.
        let now = Utc::now();
        let timestamp = inner.last_error_at.map_or(now, |last| last.max(now));
        let entry = ErrorEntry { timestamp, message };

        inner.attempted = inner.attempted.saturating_add(1);
        inner.failed = inner.failed.saturating_add(1);
        inner.last_error_at = Some(timestamp);
        inner.errors.push(entry.clone());
        entry
    }

    #[must_use]
    pub fn counts(&self) -> ProgressCounts {
        let inner = self.lock();
        ProgressCounts {
            attempted: inner.attempted,
            succeeded: inner.succeeded,
            failed: inner.failed,
            elapsed: self.started_at.elapsed(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> ProgressState {
        let inner = self.lock();
        ProgressState {
            attempted: inner.attempted,
            succeeded: inner.succeeded,
            failed: inner.failed,
            elapsed: self.started_at.elapsed(),
            errors: inner.errors.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Every critical section leaves Inner consistent, so a poisoned lock
        // still holds usable data.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
