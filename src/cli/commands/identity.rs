//! Identity API connection arguments.

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use url::Url;

pub const ARG_API_URL: &str = "api-url";
pub const ARG_API_TIMEOUT: &str = "api-timeout";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long("api-url")
                .help("Identity API base URL, example: https://auth.tld:3779")
                .env("FRONTDESK_API_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_API_TIMEOUT)
                .long("api-timeout")
                .help("Timeout in seconds for every identity API request")
                .default_value("5")
                .env("FRONTDESK_API_TIMEOUT")
                .value_parser(clap::value_parser!(u64).range(1..=300)),
        )
}

#[derive(Debug)]
pub struct Options {
    pub url: Url,
    pub timeout_seconds: u64,
}

impl Options {
    /// # Errors
    /// Returns an error if the API URL is missing or not an absolute http(s) URL.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let raw = matches
            .get_one::<String>(ARG_API_URL)
            .context("missing required argument: --api-url")?;

        let url = Url::parse(raw).with_context(|| format!("invalid identity API URL: {raw}"))?;

        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            anyhow::bail!("identity API URL must be http(s) with a host: {raw}");
        }

        let timeout_seconds = matches
            .get_one::<u64>(ARG_API_TIMEOUT)
            .copied()
            .unwrap_or(5);

        Ok(Self {
            url,
            timeout_seconds,
        })
    }
}
