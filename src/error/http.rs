use thiserror::Error;

/// Startup failures of the HTTP layer.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
}

/// Why a single request attempt counted as a failure.
///
/// These never leave a worker as errors; they are recorded in the progress
/// log and the worker keeps looping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestFailure {
    #[error("Invalid response {status}")]
    Status { status: u16 },
    #[error("Request failed: {message}")]
    Transport { message: String },
    #[error("Failed to read response body: {message}")]
    Body { message: String },
}

impl RequestFailure {
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            RequestFailure::Status { status } => Some(*status),
            RequestFailure::Transport { .. } | RequestFailure::Body { .. } => None,
        }
    }
}
