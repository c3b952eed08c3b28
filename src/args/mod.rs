//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use cli::CliArgs;
pub use parsers::{parse_header, parse_headers};
pub use types::{PositiveUsize, ReportFormat};
