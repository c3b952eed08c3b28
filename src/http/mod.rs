//! One-request execution against the target and its outcome classification.
mod client;
mod executor;
mod spec;


pub use client::build_client;
pub use executor::{HttpExecutor, RequestExecutor};
pub use spec::{Outcome, RequestSpec};
