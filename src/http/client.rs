use reqwest::Client;
use tracing::error;

use crate::error::{AppError, AppResult, HttpError};

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("infinite-wget/", env!("CARGO_PKG_VERSION"));

/// Builds the connection pool shared by every worker.
///
/// No request or connect timeout is configured; a hung request only stalls
/// the worker that issued it.
///
/// # Errors
///
/// Returns an error when the TLS backend cannot be initialized.
pub fn build_client() -> AppResult<Client> {
    Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .build()
        .map_err(|err| {
            error!("Failed to build HTTP client: {}", err);
            AppError::http(HttpError::BuildClientFailed { source: err })
        })
}
