//! Configuration loading and the validated run settings.
mod loader;
mod settings;
pub mod types;


pub use loader::load_config;
pub use settings::{OutputSettings, RunSettings};

pub(crate) use loader::load_config_file;
