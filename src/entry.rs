use clap::{CommandFactory, FromArgMatches};
use tracing::error;

use crate::args::CliArgs;
use crate::config::RunSettings;
use crate::error::AppResult;

/// Parses the command line, sets up logging and the runtime, then polls
/// until stopped.
///
/// # Errors
///
/// Returns an error when the configuration is invalid or the run cannot be
/// started. Once polling has begun the only error left is a failed final
/// report.
pub fn run() -> AppResult<()> {
    let matches = CliArgs::command().get_matches();
    let args = CliArgs::from_arg_matches(&matches)?;

    crate::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(async {
        let settings = RunSettings::resolve(&args, &matches)?;
        crate::app::run(settings).await
    });

    match result {
        Ok(_state) => Ok(()),
        Err(err) => {
            error!("{}", err);
            Err(err)
        }
    }
}
