use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

const MILLIS_PER_SEC: u128 = 1000;

/// One recorded failure, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// Counter view without the error log, cheap enough for every progress tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressCounts {
    pub attempted: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub elapsed: Duration,
}

impl ProgressCounts {
    /// Whole requests per second over the elapsed time, 0 before the first
    /// millisecond has passed.
    #[must_use]
    pub fn throughput_per_sec(&self) -> u64 {
        throughput(self.attempted, self.elapsed)
    }
}

/// Full point-in-time copy of the aggregator state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressState {
    pub attempted: u64,
    pub succeeded: u64,
    pub failed: u64,
    #[serde(serialize_with = "serialize_millis", rename = "elapsed_ms")]
    pub elapsed: Duration,
    pub errors: Vec<ErrorEntry>,
}

impl ProgressState {
    #[must_use]
    pub fn throughput_per_sec(&self) -> u64 {
        throughput(self.attempted, self.elapsed)
    }
}

fn throughput(attempted: u64, elapsed: Duration) -> u64 {
    let per_sec = u128::from(attempted)
        .saturating_mul(MILLIS_PER_SEC)
        .checked_div(elapsed.as_millis())
        .unwrap_or(0);
    u64::try_from(per_sec).unwrap_or(u64::MAX)
}

fn serialize_millis<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
}
