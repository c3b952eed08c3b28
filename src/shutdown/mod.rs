//! Cooperative cancellation and the stop-signal driven shutdown sequence.
mod coordinator;
mod signals;
mod token;

#[cfg(test)]
mod tests;

pub use coordinator::ShutdownCoordinator;
pub use signals::{ChannelStopSignal, OsStopSignal, StopSignal};
pub use token::ShutdownToken;
