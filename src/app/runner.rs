use std::sync::Arc;

use tracing::debug;

use crate::config::RunSettings;
use crate::error::AppResult;
use crate::http::{HttpExecutor, build_client};
use crate::progress::ProgressState;
use crate::scheduler;
use crate::shutdown::{OsStopSignal, ShutdownCoordinator, StopSignal};
use crate::sinks::{ConsoleSink, OutputSink};

/// Polls until Ctrl+C (or SIGTERM), then returns the reported snapshot.
///
/// # Errors
///
/// Returns an error when signal handlers cannot be installed, the HTTP
/// client cannot be built, or the final report cannot be written.
pub async fn run(settings: RunSettings) -> AppResult<ProgressState> {
    // Registered before any worker starts so an early Ctrl+C still drains.
    let signal = OsStopSignal::register()?;
    let sink: Arc<dyn OutputSink> = Arc::new(ConsoleSink::new(
        settings.output.format,
        settings.output.no_color,
    ));
    run_until_stopped(settings, signal, sink).await
}

/// Same as [`run`] with the stop source and the output supplied by the caller.
///
/// # Errors
///
/// Returns an error when the HTTP client cannot be built, the scheduler
/// rejects the worker settings, a background task panics, or the final
/// report cannot be written.
pub async fn run_until_stopped<S: StopSignal>(
    settings: RunSettings,
    signal: S,
    sink: Arc<dyn OutputSink>,
) -> AppResult<ProgressState> {
    let executor = Arc::new(HttpExecutor::new(
        build_client()?,
        settings.worker.log_response_body,
        Arc::clone(&sink),
    ));
    let handle = scheduler::start(settings.request, settings.worker, executor, Arc::clone(&sink))?;

    let reporter = settings.output.progress_interval.map(|every| {
        super::spawn_progress_reporter(
            Arc::clone(handle.progress()),
            Arc::clone(&sink),
            every,
            handle.shutdown_token().clone(),
        )
    });

    let state = ShutdownCoordinator::new(signal, sink).run(handle).await?;
    if let Some(reporter) = reporter {
        reporter.await?;
    }
    debug!("Run finished after {} request(s).", state.attempted);
    Ok(state)
}
