use clap::Parser;
use std::path::PathBuf;

use super::parsers::{parse_millis, parse_parallelism};
use super::types::{PositiveUsize, ReportFormat};

const EXAMPLES: &str = "\
Examples:
  infinite-wget http://httpbin.org/get -p 2
  infinite-wget http://httpbin.org/post -l -m POST -b ./my-body.txt
  infinite-wget http://localhost:8080/health -s 500 -H X-Probe=1 --log-errors

Press Ctrl+C to stop; the totals and every recorded error are printed on exit.";

#[derive(Debug, Parser, Clone)]
#[command(
    name = "infinite-wget",
    version,
    about = "Repeat one HTTP request forever at a fixed concurrency, with live progress and a full error report on Ctrl+C.",
    after_help = EXAMPLES
)]
pub struct CliArgs {
    /// Target URL
    #[arg(env = "INFINITE_WGET_URL")]
    pub url: Option<String>,

    /// Parallel calls
    #[arg(
        long,
        short = 'p',
        default_value = "1",
        env = "INFINITE_WGET_PARALLELISM",
        value_parser = parse_parallelism
    )]
    pub parallelism: PositiveUsize,

    /// Sleep between two calls of the same worker, in milliseconds
    #[arg(
        long = "sleep",
        short = 's',
        default_value = "0",
        env = "INFINITE_WGET_SLEEP",
        value_parser = parse_millis
    )]
    pub sleep_ms: u64,

    /// HTTP method
    #[arg(long, short = 'm', default_value = "GET", env = "INFINITE_WGET_METHOD")]
    pub method: String,

    /// Print every successful response body
    #[arg(long = "log-response", short = 'l', env = "INFINITE_WGET_LOG_RESPONSE")]
    pub log_response: bool,

    /// File whose contents are sent as the request body
    #[arg(long, short = 'b', env = "INFINITE_WGET_BODY")]
    pub body: Option<PathBuf>,

    /// Header in "key=value" form (repeatable)
    #[arg(long = "header", short = 'H')]
    pub headers: Vec<String>,

    /// Print each failure as it happens, not only in the final report
    #[arg(long = "log-errors", env = "INFINITE_WGET_LOG_ERRORS")]
    pub log_errors: bool,

    /// Progress report interval in milliseconds (0 disables)
    #[arg(
        long = "progress-interval",
        default_value = "1000",
        env = "INFINITE_WGET_PROGRESS_INTERVAL",
        value_parser = parse_millis
    )]
    pub progress_interval_ms: u64,

    /// Final report format
    #[arg(long, value_enum, default_value = "text", env = "INFINITE_WGET_FORMAT")]
    pub format: ReportFormat,

    /// Config file (.toml or .json); command-line values take precedence
    #[arg(long, short = 'c', env = "INFINITE_WGET_CONFIG")]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
