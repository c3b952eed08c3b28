use std::time::Duration;

use chrono::SecondsFormat;
use serde::Serialize;

use crate::progress::{ProgressCounts, ProgressState};

pub(crate) const LABEL: &str = "infinite-wget";

#[must_use]
pub fn progress_line(counts: &ProgressCounts) -> String {
    format!(
        "{}: {} requests ({} ok, {} failed) in {}, {} req/s",
        LABEL,
        counts.attempted,
        counts.succeeded,
        counts.failed,
        format_elapsed(counts.elapsed),
        counts.throughput_per_sec()
    )
}

/// Plain-text final report; errors are listed in the order they occurred.
#[must_use]
pub fn render_text_report(state: &ProgressState) -> String {
    let mut lines = vec![
        format!("{}: stopped after {}", LABEL, format_elapsed(state.elapsed)),
        format!("Requests:   {}", state.attempted),
        format!("Succeeded:  {}", state.succeeded),
        format!("Failed:     {}", state.failed),
        format!("Throughput: {} req/s", state.throughput_per_sec()),
    ];
    if state.errors.is_empty() {
        lines.push("Errors: none".to_owned());
    } else {
        lines.push(format!("Errors ({}):", state.errors.len()));
        for entry in &state.errors {
            lines.push(format!(
                "- {} {}",
                entry
                    .timestamp
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
                entry.message
            ));
        }
    }
    lines.join("\n")
}

#[derive(Serialize)]
struct JsonReport<'state> {
    #[serde(flatten)]
    state: &'state ProgressState,
    throughput_per_sec: u64,
}

/// JSON final report.
///
/// # Errors
///
/// Returns an error when serialization fails.
pub fn render_json_report(state: &ProgressState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonReport {
        state,
        throughput_per_sec: state.throughput_per_sec(),
    })
}

fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    let secs = millis.checked_div(1000).unwrap_or(0);
    let tenths = millis.checked_rem(1000).unwrap_or(0).checked_div(100).unwrap_or(0);
    format!("{}.{}s", secs, tenths)
}
