use serde::Deserialize;

use crate::args::ReportFormat;

/// On-disk configuration. Every field is optional; command-line values and
/// environment variables win over anything set here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub method: Option<String>,
    pub parallelism: Option<usize>,
    #[serde(alias = "sleep")]
    pub sleep_ms: Option<u64>,
    pub log_response: Option<bool>,
    pub log_errors: Option<bool>,
    /// Path of the request body file, relative to the working directory.
    pub body: Option<String>,
    pub headers: Option<Vec<String>>,
    pub progress_interval_ms: Option<u64>,
    pub format: Option<ReportFormat>,
}
