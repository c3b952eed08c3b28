use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::error::{AppError, AppResult};

use super::CliArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<(CliArgs, ArgMatches)>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = CliArgs::command()
        .try_get_matches_from(args)
        .map_err(AppError::from)?;
    let parsed = CliArgs::from_arg_matches(&matches)?;
    Ok((parsed, matches))
}
