//! `-v` / `FRONTDESK_LOG_LEVEL`: repeat the flag or name a level.

use clap::{builder::ValueParser, Arg, ArgAction, ArgMatches, Command};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";

/// Verbosity count to level. `error` is the subscriber default, so it maps to `None`.
const LEVELS: [(&str, Option<Level>); 5] = [
    ("error", None),
    ("warn", Some(Level::WARN)),
    ("info", Some(Level::INFO)),
    ("debug", Some(Level::DEBUG)),
    ("trace", Some(Level::TRACE)),
];

const MAX_VERBOSITY: usize = LEVELS.len() - 1;

/// Accepts a level name or a count; counts past `trace` saturate like repeated `-v` does.
fn parse_verbosity(value: &str) -> Result<u8, String> {
    let value = value.trim().to_ascii_lowercase();

    let index = match value.parse::<usize>() {
        Ok(count) => count.min(MAX_VERBOSITY),
        Err(_) => LEVELS
            .iter()
            .position(|(name, _)| *name == value)
            .ok_or_else(|| {
                format!("invalid log level `{value}` (expected error, warn, info, debug or trace)")
            })?,
    };

    u8::try_from(index).map_err(|err| err.to_string())
}

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(parse_verbosity)
}

/// Tracing level requested on the command line, `None` keeps the default.
#[must_use]
pub fn level(matches: &ArgMatches) -> Option<Level> {
    let count = matches.get_one::<u8>(ARG_VERBOSITY).copied().unwrap_or(0);

    LEVELS
        .get(usize::from(count).min(MAX_VERBOSITY))
        .and_then(|(_, level)| *level)
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Log level: repeat -v or name one of error, warn, info, debug, trace")
            .env("FRONTDESK_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}
