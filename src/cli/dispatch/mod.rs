//! Maps validated CLI arguments to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{self, identity};
use anyhow::Result;

/// # Errors
/// Returns an error if required arguments are missing or invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let identity_opts = identity::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port: matches
            .get_one::<u16>(commands::ARG_PORT)
            .copied()
            .unwrap_or(8080),
        api_url: identity_opts.url,
        api_timeout_seconds: identity_opts.timeout_seconds,
        cookie_secure: matches.get_flag(commands::ARG_COOKIE_SECURE),
    }))
}
