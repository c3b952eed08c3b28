use tracing_subscriber::EnvFilter;

/// Checked in order; the first one set provides the filter directive.
const FILTER_ENV_VARS: [&str; 2] = ["INFINITE_WGET_LOG", "RUST_LOG"];

/// Installs the global `tracing` subscriber, writing to stderr so stdout
/// carries only response bodies and the final report.
///
/// Calling it again is harmless; the first subscriber stays.
pub fn init_logging(verbose: bool, no_color: bool) {
    let directive = FILTER_ENV_VARS
        .iter()
        .find_map(|name| std::env::var(name).ok());
    let installed = tracing_subscriber::fmt()
        .with_env_filter(build_filter(directive.as_deref(), verbose))
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .try_init();

    if let Err(err) = installed {
        tracing::debug!("Logging already initialized: {}", err);
    }
}

fn build_filter(directive: Option<&str>, verbose: bool) -> EnvFilter {
    let fallback = if verbose { "debug" } else { "info" };
    match directive.map(EnvFilter::try_new) {
        Some(Ok(filter)) => filter,
        Some(Err(err)) => {
            eprintln!("Ignoring invalid log filter: {}", err);
            EnvFilter::new(fallback)
        }
        None => EnvFilter::new(fallback),
    }
}
