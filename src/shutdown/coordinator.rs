use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::progress::ProgressState;
use crate::scheduler::SchedulerHandle;
use crate::sinks::OutputSink;

use super::signals::StopSignal;

/// Turns an external stop request into an orderly end of the run.
///
/// First request: raise the shutdown flag, let every in-flight request
/// finish and be recorded, then report. A second request while draining
/// abandons whatever is still in flight and reports immediately.
pub struct ShutdownCoordinator<S> {
    signal: S,
    sink: Arc<dyn OutputSink>,
}

impl<S: StopSignal> ShutdownCoordinator<S> {
    #[must_use]
    pub fn new(signal: S, sink: Arc<dyn OutputSink>) -> Self {
        Self { signal, sink }
    }

    /// Blocks until a stop request arrives, then drains and reports.
    ///
    /// Returns the final snapshot that was reported.
    ///
    /// # Errors
    ///
    /// Returns an error when the final report cannot be written.
    pub async fn run(mut self, mut handle: SchedulerHandle) -> AppResult<ProgressState> {
        self.signal.recv().await;
        info!(
            "Stop requested; waiting for {} worker(s) to finish their current request.",
            handle.running()
        );
        handle.cancel();

        let forced = tokio::select! {
            () = handle.drain() => false,
            () = self.signal.recv() => true,
        };
        if forced {
            warn!("Second stop request received; not waiting for in-flight requests.");
            handle.abort().await;
        }

        for exit in handle.exits() {
            debug!(worker = exit.id, iterations = exit.iterations, "Worker drained");
        }

        let state = handle.progress().snapshot();
        self.sink.final_report(&state)?;
        Ok(state)
    }
}
