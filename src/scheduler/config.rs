use std::time::Duration;

/// Pacing and logging knobs shared read-only by all workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub parallelism: usize,
    pub sleep_ms: u64,
    pub log_response_body: bool,
    /// Hand each failure to the output sink as it is recorded, not only in
    /// the final report.
    pub log_errors: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            parallelism: 1,
            sleep_ms: 0,
            log_response_body: false,
            log_errors: false,
        }
    }
}

impl WorkerConfig {
    /// Delay between one iteration's outcome and the next request, if any.
    #[must_use]
    pub const fn pause(&self) -> Option<Duration> {
        if self.sleep_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.sleep_ms))
        }
    }
}
