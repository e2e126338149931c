//! Session Gate: resolves the caller's identity and keeps anonymous callers on the public
//! routes.
//!
//! Flow: read the `session` cookie, ask the identity API for the matching user (one call,
//! no retries, no caching), attach the result to the request as [`CurrentUser`], then
//! either let the request through or answer `302 Location: /login`.

use crate::frontdesk::{
    handlers::found,
    identity::{User, WhoAmI},
    session::extract_session_token,
    AppState,
};
use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

pub const LOGIN_PATH: &str = "/login";

/// Routes reachable without an identity. Matched exactly against the request path.
pub const PUBLIC_ROUTES: [&str; 4] = ["/login", "/register", "/request-reset", "/reset"];

/// Identity resolved by the gate for the current request, `None` when anonymous.
#[derive(Clone, Debug, Default)]
pub struct CurrentUser(pub Option<User>);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Redirect,
}

#[must_use]
pub fn is_public_route(path: &str) -> bool {
    PUBLIC_ROUTES.contains(&path)
}

#[must_use]
pub fn decide(user: Option<&User>, path: &str) -> GateDecision {
    if user.is_none() && !is_public_route(path) {
        GateDecision::Redirect
    } else {
        GateDecision::Proceed
    }
}

/// Axum middleware applying the gate to every page request.
pub async fn session_gate(
    Extension(state): Extension<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = extract_session_token(request.headers());

    // A down identity API and a rejected session both leave the caller anonymous.
    let user = match state.identity().whoami(token.as_deref()).await {
        WhoAmI::Authenticated(user) => Some(user),
        WhoAmI::Rejected(status) => {
            debug!(%status, has_token = token.is_some(), "session not resolved");
            None
        }
        WhoAmI::Unavailable(reason) => {
            warn!(%reason, "identity API unavailable, treating caller as anonymous");
            None
        }
    };

    let path = request.uri().path();
    match decide(user.as_ref(), path) {
        GateDecision::Redirect => {
            debug!(path, "redirecting anonymous caller to login");
            found(LOGIN_PATH)
        }
        GateDecision::Proceed => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
    }
}
