//! Starts the workers and hands back a handle to steer them.
mod config;
mod handle;
mod worker;


pub use config::WorkerConfig;
pub use handle::SchedulerHandle;
pub use worker::WorkerExit;

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::info;

use crate::error::{AppError, AppResult, ValidationError};
use crate::http::{RequestExecutor, RequestSpec};
use crate::progress::ProgressAggregator;
use crate::shutdown::ShutdownToken;
use crate::sinks::OutputSink;

use worker::{Worker, WorkerContext};

/// Spawns `config.parallelism` workers that share one aggregator, one
/// executor and one shutdown token.
///
/// Must be called inside a tokio runtime.
///
/// # Errors
///
/// Returns an error, before any worker is spawned, when `parallelism` is 0.
pub fn start(
    spec: RequestSpec,
    config: WorkerConfig,
    executor: Arc<dyn RequestExecutor>,
    sink: Arc<dyn OutputSink>,
) -> AppResult<SchedulerHandle> {
    if config.parallelism == 0 {
        return Err(AppError::validation(ValidationError::ValueTooSmall { min: 1 }));
    }

    let context = Arc::new(WorkerContext {
        spec,
        config,
        executor,
        sink,
        progress: Arc::new(ProgressAggregator::new()),
        shutdown: ShutdownToken::new(),
    });

    info!(
        "Starting {} worker(s): {} {}",
        context.config.parallelism,
        context.spec.method(),
        context.spec.url()
    );

    let mut workers = JoinSet::new();
    for id in 0..context.config.parallelism {
        let worker = Worker::new(id, Arc::clone(&context));
        workers.spawn(worker.run());
    }

    Ok(SchedulerHandle::new(
        Arc::clone(&context.progress),
        context.shutdown.clone(),
        workers,
    ))
}
