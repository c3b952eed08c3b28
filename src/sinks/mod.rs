//! Where progress, response bodies and the final report go.
mod console;
pub(crate) mod format;

#[cfg(test)]
pub(crate) mod test_support;

pub use console::ConsoleSink;
pub use format::{render_json_report, render_text_report};

use crate::progress::{ErrorEntry, ProgressCounts, ProgressState};

/// Output side of the engine. Called concurrently from every worker.
pub trait OutputSink: Send + Sync {
    /// A 2xx response body, when response logging is on.
    fn response_body(&self, body: &str);

    /// A failure as it is recorded, when streaming error logging is on.
    fn failure(&self, worker: usize, entry: &ErrorEntry);

    fn progress(&self, counts: &ProgressCounts);

    /// Final counts and the complete error log, once, at shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error when the report cannot be written.
    fn final_report(&self, state: &ProgressState) -> std::io::Result<()>;
}
