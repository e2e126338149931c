//! # Frontdesk (session-gated web front-end)
//!
//! `frontdesk` serves the login, registration, password-reset and profile screens of an
//! account system whose state lives entirely in a remote identity API.
//!
//! ## Session Gate
//!
//! Every page request passes through [`frontdesk::gate::session_gate`]. The gate reads the
//! `session` cookie, asks the identity API who the caller is (`GET /user` with a bearer
//! token) and attaches the resolved user to the request. Callers without an identity may
//! only reach the public routes (`/login`, `/register`, `/request-reset`, `/reset`);
//! everything else is redirected to `/login` with a `302`.
//!
//! The identity is recomputed on every request and never cached. An unreachable identity
//! API is treated the same as an invalid session (fail closed) but logged separately.

pub mod cli;
pub mod frontdesk;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
