mod progress;
mod runner;


pub use progress::spawn_progress_reporter;
pub use runner::{run, run_until_stopped};
