use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{error, warn};

use crate::progress::ProgressAggregator;
use crate::shutdown::ShutdownToken;

use super::worker::WorkerExit;

/// Running workers plus the shared state they feed.
pub struct SchedulerHandle {
    progress: Arc<ProgressAggregator>,
    shutdown: ShutdownToken,
    workers: JoinSet<WorkerExit>,
    exits: Vec<WorkerExit>,
}

impl SchedulerHandle {
    pub(super) const fn new(
        progress: Arc<ProgressAggregator>,
        shutdown: ShutdownToken,
        workers: JoinSet<WorkerExit>,
    ) -> Self {
        Self {
            progress,
            shutdown,
            workers,
            exits: Vec::new(),
        }
    }

    #[must_use]
    pub const fn progress(&self) -> &Arc<ProgressAggregator> {
        &self.progress
    }

    #[must_use]
    pub const fn shutdown_token(&self) -> &ShutdownToken {
        &self.shutdown
    }

    /// Asks every worker to stop after its current iteration.
    pub fn cancel(&self) -> bool {
        self.shutdown.cancel()
    }

    #[must_use]
    pub fn running(&self) -> usize {
        self.workers.len()
    }

    /// Waits until every worker has left its loop.
    ///
    /// Cancel-safe: dropping the future keeps already joined exits, and the
    /// remaining workers can still be drained or aborted afterwards.
    pub async fn drain(&mut self) {
        while let Some(joined) = self.workers.join_next().await {
            match joined {
                Ok(exit) => self.exits.push(exit),
                Err(err) if err.is_cancelled() => {}
                Err(err) => error!("Worker task failed: {}", err),
            }
        }
    }

    /// Drops the remaining workers, abandoning their in-flight requests.
    pub async fn abort(&mut self) {
        let remaining = self.workers.len();
        if remaining > 0 {
            warn!("Abandoning {} in-flight request(s).", remaining);
        }
        self.workers.abort_all();
        self.drain().await;
    }

    /// Exits of the workers that stopped on their own, in completion order.
    #[must_use]
    pub fn exits(&self) -> &[WorkerExit] {
        &self.exits
    }
}
