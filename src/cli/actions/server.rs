use crate::frontdesk::{self, identity::IdentityClient, AppState, CookieConfig};
use anyhow::Result;
use std::{sync::Arc, time::Duration};
use tracing::debug;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub api_url: Url,
    pub api_timeout_seconds: u64,
    pub cookie_secure: bool,
}

/// Execute the server action.
///
/// # Errors
/// Returns an error if the identity client cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Server args: {:?}", args);

    let identity = IdentityClient::new(
        args.api_url,
        Duration::from_secs(args.api_timeout_seconds),
    )?;

    let state = Arc::new(AppState::new(
        identity,
        CookieConfig::new(args.cookie_secure),
    ));

    frontdesk::new(args.port, state).await
}
