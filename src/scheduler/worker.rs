use std::sync::Arc;

use tokio::task::yield_now;
use tokio::time::sleep;
use tracing::{debug, trace};

use crate::http::{Outcome, RequestExecutor, RequestSpec};
use crate::progress::ProgressAggregator;
use crate::shutdown::ShutdownToken;
use crate::sinks::OutputSink;

use super::config::WorkerConfig;

/// Everything a worker borrows; built once per run.
pub(super) struct WorkerContext {
    pub(super) spec: RequestSpec,
    pub(super) config: WorkerConfig,
    pub(super) executor: Arc<dyn RequestExecutor>,
    pub(super) sink: Arc<dyn OutputSink>,
    pub(super) progress: Arc<ProgressAggregator>,
    pub(super) shutdown: ShutdownToken,
}

/// How a worker's loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerExit {
    pub id: usize,
    pub iterations: u64,
}

pub(super) struct Worker {
    id: usize,
    context: Arc<WorkerContext>,
}

impl Worker {
    pub(super) const fn new(id: usize, context: Arc<WorkerContext>) -> Self {
        Self { id, context }
    }

    /// Request, record, pause, repeat until the shutdown flag is seen at the
    /// top of an iteration. A started request always runs to completion and
    /// is recorded; only the pause is cut short by shutdown.
    pub(super) async fn run(self) -> WorkerExit {
        let context = self.context.as_ref();
        let pause = context.config.pause();
        let mut iterations: u64 = 0;
        debug!(worker = self.id, "Worker started");

        loop {
            if context.shutdown.is_cancelled() {
                break;
            }

            let outcome = context.executor.execute(&context.spec).await;
            iterations = iterations.saturating_add(1);
            self.record(&outcome);

            match pause {
                Some(pause) => {
                    tokio::select! {
                        biased;
                        () = context.shutdown.cancelled() => break,
                        () = sleep(pause) => {}
                    }
                }
                // Without a pause, still give other tasks a turn.
                None => yield_now().await,
            }
        }

        debug!(worker = self.id, iterations, "Worker stopped");
        WorkerExit {
            id: self.id,
            iterations,
        }
    }

    fn record(&self, outcome: &Outcome) {
        let context = self.context.as_ref();
        match outcome {
            Outcome::Success { status, bytes } => {
                trace!(worker = self.id, status, bytes, "Request succeeded");
                context.progress.record_success();
            }
            Outcome::Failure(failure) => {
                trace!(worker = self.id, "Request failed: {}", failure);
                let entry = context.progress.record_failure(failure.to_string());
                if context.config.log_errors {
                    context.sink.failure(self.id, &entry);
                }
            }
        }
    }
}
