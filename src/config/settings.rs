use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{CliArgs, PositiveUsize, ReportFormat, parse_headers};
use crate::error::{AppError, AppResult, ConfigError};
use crate::http::RequestSpec;
use crate::scheduler::WorkerConfig;

use super::loader::load_config;
use super::types::ConfigFile;

/// How results are surfaced; not seen by workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSettings {
    /// `None` turns periodic progress off.
    pub progress_interval: Option<Duration>,
    pub format: ReportFormat,
    pub no_color: bool,
}

/// Everything a run needs, validated as one unit before any worker starts.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub request: RequestSpec,
    pub worker: WorkerConfig,
    pub output: OutputSettings,
}

impl RunSettings {
    /// Loads the config file (if any) and merges it under the CLI values.
    ///
    /// # Errors
    ///
    /// Returns an error when the config file is unreadable or any merged
    /// value is invalid.
    pub fn resolve(args: &CliArgs, matches: &ArgMatches) -> AppResult<Self> {
        let file = load_config(args.config.as_deref())?.unwrap_or_default();
        Self::merge(args, matches, &file)
    }

    pub(crate) fn merge(
        args: &CliArgs,
        matches: &ArgMatches,
        file: &ConfigFile,
    ) -> AppResult<Self> {
        let url = pick(matches, "url", args.url.clone(), file.url.clone())
            .ok_or_else(|| AppError::config(ConfigError::MissingUrl))?;
        let method = choose(matches, "method", args.method.clone(), file.method.clone());

        let parallelism = match file.parallelism {
            Some(value) if !is_explicit(matches, "parallelism") => {
                PositiveUsize::try_from(value).map_err(|err| {
                    AppError::config(ConfigError::InvalidField {
                        field: "parallelism",
                        source: err,
                    })
                })?
            }
            Some(_) | None => args.parallelism,
        };
        let sleep_ms = choose(matches, "sleep_ms", args.sleep_ms, file.sleep_ms);
        let log_response = choose(matches, "log_response", args.log_response, file.log_response);
        let log_errors = choose(matches, "log_errors", args.log_errors, file.log_errors);
        let progress_interval_ms = choose(
            matches,
            "progress_interval_ms",
            args.progress_interval_ms,
            file.progress_interval_ms,
        );
        let format = choose(matches, "format", args.format, file.format);

        let header_entries = if is_explicit(matches, "headers") {
            args.headers.clone()
        } else {
            file.headers.clone().unwrap_or_default()
        };
        let body_path = pick(
            matches,
            "body",
            args.body.clone(),
            file.body.as_ref().map(PathBuf::from),
        );
        let body = body_path.as_deref().map(read_body).transpose()?;

        let request = RequestSpec::new(&url, &method, parse_headers(&header_entries), body)?;

        Ok(Self {
            request,
            worker: WorkerConfig {
                parallelism: parallelism.get(),
                sleep_ms,
                log_response_body: log_response,
                log_errors,
            },
            output: OutputSettings {
                progress_interval: (progress_interval_ms > 0)
                    .then_some(Duration::from_millis(progress_interval_ms)),
                format,
                no_color: args.no_color,
            },
        })
    }
}

fn read_body(path: &Path) -> AppResult<Bytes> {
    std::fs::read(path).map(Bytes::from).map_err(|err| {
        AppError::config(ConfigError::ReadBody {
            path: path.to_path_buf(),
            source: err,
        })
    })
}

fn is_explicit(matches: &ArgMatches, id: &str) -> bool {
    matches!(
        matches.value_source(id),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

/// CLI/env value if it was given, else the config value, else the CLI
/// default.
fn choose<T>(matches: &ArgMatches, id: &str, cli: T, file: Option<T>) -> T {
    match file {
        Some(value) if !is_explicit(matches, id) => value,
        Some(_) | None => cli,
    }
}

fn pick<T>(matches: &ArgMatches, id: &str, cli: Option<T>, file: Option<T>) -> Option<T> {
    if is_explicit(matches, id) {
        cli.or(file)
    } else {
        file.or(cli)
    }
}
