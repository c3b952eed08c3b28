use super::*;
use crate::error::{AppError, AppResult, RequestFailure};
use crate::http::{Outcome, RequestExecutor, RequestSpec};
use crate::scheduler::{self, WorkerConfig};
use crate::sinks::test_support::RecordingSink;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::{sleep, timeout};

const WAIT_LIMIT: Duration = Duration::from_secs(5);

fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

fn spec() -> AppResult<RequestSpec> {
    Ok(RequestSpec::new(
        "http://127.0.0.1:9/",
        "GET",
        BTreeMap::new(),
        None,
    )?)
}

/// Fails every other request after a short delay.
#[derive(Default)]
struct AlternatingExecutor {
    calls: AtomicU64,
}

#[async_trait]
impl RequestExecutor for AlternatingExecutor {
    async fn execute(&self, _spec: &RequestSpec) -> Outcome {
        sleep(Duration::from_millis(2)).await;
        if self.calls.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
            Outcome::Success {
                status: 200,
                bytes: 2,
            }
        } else {
            Outcome::Failure(RequestFailure::Status { status: 503 })
        }
    }
}

struct StuckExecutor;

#[async_trait]
impl RequestExecutor for StuckExecutor {
    async fn execute(&self, _spec: &RequestSpec) -> Outcome {
        std::future::pending::<()>().await;
        Outcome::Success {
            status: 200,
            bytes: 0,
        }
    }
}

#[test]
fn token_cancel_is_idempotent_and_shared() -> AppResult<()> {
    run_async_test(async {
        let token = ShutdownToken::new();
        let observer = token.clone();
        if observer.is_cancelled() {
            return Err(AppError::validation("Token starts cancelled"));
        }
        if !token.cancel() || token.cancel() {
            return Err(AppError::validation("Only the first cancel should report true"));
        }
        timeout(WAIT_LIMIT, observer.cancelled())
            .await
            .map_err(|_elapsed| AppError::validation("Clone never saw the cancel"))?;
        if !observer.is_cancelled() {
            return Err(AppError::validation("Clone should see the flag"));
        }
        Ok(())
    })
}

#[test]
fn stop_request_drains_and_reports_once() -> AppResult<()> {
    run_async_test(async {
        let sink = Arc::new(RecordingSink::default());
        let handle = scheduler::start(
            spec()?,
            WorkerConfig {
                parallelism: 3,
                ..WorkerConfig::default()
            },
            Arc::new(AlternatingExecutor::default()),
            sink.clone(),
        )?;
        let progress = Arc::clone(handle.progress());
        let token = handle.shutdown_token().clone();

        let (stop_tx, signal) = ChannelStopSignal::new();
        let coordinator = ShutdownCoordinator::new(signal, sink.clone());
        let run = tokio::spawn(coordinator.run(handle));

        while progress.counts().attempted < 10 {
            sleep(Duration::from_millis(5)).await;
        }
        stop_tx
            .send(())
            .map_err(|_closed| AppError::validation("Coordinator dropped its receiver"))?;

        let state = timeout(WAIT_LIMIT, run)
            .await
            .map_err(|_elapsed| AppError::validation("Coordinator did not finish"))???;

        if !token.is_cancelled() {
            return Err(AppError::validation("Shutdown flag was not raised"));
        }
        if state.attempted != state.succeeded.saturating_add(state.failed)
            || u64::try_from(state.errors.len()).unwrap_or(u64::MAX) != state.failed
        {
            return Err(AppError::validation(format!("Inconsistent report: {:?}", state)));
        }
        let after = progress.snapshot();
        if after.attempted != state.attempted {
            return Err(AppError::validation("Requests were recorded after the report"));
        }
        let reports = sink.reports();
        if reports.len() != 1 || reports.first() != Some(&state) {
            return Err(AppError::validation(format!(
                "Expected exactly one matching report, got {}",
                reports.len()
            )));
        }
        Ok(())
    })
}

#[test]
fn second_stop_request_abandons_in_flight_work() -> AppResult<()> {
    run_async_test(async {
        let sink = Arc::new(RecordingSink::default());
        let handle = scheduler::start(
            spec()?,
            WorkerConfig {
                parallelism: 2,
                ..WorkerConfig::default()
            },
            Arc::new(StuckExecutor),
            sink.clone(),
        )?;

        let (stop_tx, signal) = ChannelStopSignal::new();
        let coordinator = ShutdownCoordinator::new(signal, sink.clone());
        for _ in 0..2 {
            stop_tx
                .send(())
                .map_err(|_closed| AppError::validation("Coordinator dropped its receiver"))?;
        }

        let state = timeout(WAIT_LIMIT, coordinator.run(handle))
            .await
            .map_err(|_elapsed| AppError::validation("Second stop did not force exit"))??;
        if state.attempted != 0 {
            return Err(AppError::validation(format!("Unexpected counts: {:?}", state)));
        }
        if sink.reports().len() != 1 {
            return Err(AppError::validation("Expected one final report"));
        }
        Ok(())
    })
}

#[cfg(unix)]
#[test]
fn os_signal_delivers_sigterm() -> AppResult<()> {
    run_async_test(async {
        let mut signal = OsStopSignal::register()?;
        // SAFETY: raise only queues a signal for this process; the handler
        // installed above consumes it.
        let rc = unsafe { libc::raise(libc::SIGTERM) };
        if rc != 0 {
            return Err(AppError::validation("raise(SIGTERM) failed"));
        }
        timeout(WAIT_LIMIT, signal.recv())
            .await
            .map_err(|_elapsed| AppError::validation("SIGTERM was not observed"))?;
        Ok(())
    })
}
