//! Core library for the `infinite-wget` CLI.
//!
//! The binary repeats one HTTP request forever from a fixed number of
//! concurrent workers, shows live progress, and prints a full report when
//! it is interrupted. The pieces are exposed here so they can be driven
//! without the CLI: [`scheduler::start`] runs the workers, a
//! [`shutdown::ShutdownCoordinator`] stops them, and an
//! [`sinks::OutputSink`] receives everything worth showing.
pub mod app;
pub mod args;
pub mod config;
mod entry;
pub mod error;
pub mod http;
mod logger;
pub mod progress;
pub mod scheduler;
pub mod shutdown;
pub mod sinks;

pub use entry::run;
pub use logger::init_logging;
