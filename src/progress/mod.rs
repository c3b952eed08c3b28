//! Shared request counters and the ordered failure log.
mod aggregator;
mod types;


pub use aggregator::ProgressAggregator;
pub use types::{ErrorEntry, ProgressCounts, ProgressState};
