use std::collections::BTreeMap;

use super::types::PositiveUsize;
use crate::error::ValidationError;

/// Splits `key=value` on the first `=`. A missing `=` gives an empty value.
#[must_use]
pub fn parse_header(s: &str) -> (String, String) {
    match s.split_once('=') {
        Some((key, value)) => (key.to_owned(), value.to_owned()),
        None => (s.to_owned(), String::new()),
    }
}

/// Builds the header mapping from repeated `key=value` entries.
///
/// Empty entries are skipped; a repeated key keeps its last value.
#[must_use]
pub fn parse_headers<S: AsRef<str>>(entries: &[S]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(AsRef::as_ref)
        .filter(|entry| !entry.is_empty())
        .map(parse_header)
        .collect()
}

pub(super) fn parse_parallelism(s: &str) -> Result<PositiveUsize, ValidationError> {
    s.parse::<PositiveUsize>()
}

pub(super) fn parse_millis(s: &str) -> Result<u64, ValidationError> {
    s.trim()
        .parse::<u64>()
        .map_err(|err| ValidationError::InvalidNumber {
            value: s.to_owned(),
            source: err,
        })
}
