use super::found;
use crate::frontdesk::{gate::LOGIN_PATH, session::clear_session_cookie, AppState};
use axum::{extract::Extension, http::header::SET_COOKIE, response::Response};
use std::sync::Arc;
use tracing::error;

/// Drop the session cookie and send the caller back to the login screen.
pub async fn logout(Extension(state): Extension<Arc<AppState>>) -> Response {
    let mut response = found(LOGIN_PATH);

    match clear_session_cookie(state.cookies().secure()) {
        Ok(cookie) => {
            response.headers_mut().insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build clearing cookie: {err}"),
    }

    response
}
