use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::progress::ProgressAggregator;
use crate::shutdown::ShutdownToken;
use crate::sinks::OutputSink;

/// Hands a counter snapshot to the sink every `every` until shutdown.
///
/// The first tick fires one full interval after the call. A zero interval
/// is treated as one millisecond.
#[must_use]
pub fn spawn_progress_reporter(
    progress: Arc<ProgressAggregator>,
    sink: Arc<dyn OutputSink>,
    every: Duration,
    shutdown: ShutdownToken,
) -> JoinHandle<()> {
    let every = every.max(Duration::from_millis(1));
    tokio::spawn(async move {
        let start = Instant::now().checked_add(every).unwrap_or_else(Instant::now);
        let mut ticker = tokio::time::interval_at(start, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                _ = ticker.tick() => sink.progress(&progress.counts()),
            }
        }
    })
}
