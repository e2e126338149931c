use super::{fail, form_fields, found};
use crate::frontdesk::{
    identity::LoginOutcome,
    session::{session_cookie, valid_session_token},
    AppState,
};
use axum::{
    extract::{rejection::FormRejection, Extension, Form},
    http::{header::SET_COOKIE, StatusCode},
    response::Response,
};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, instrument};

#[derive(Deserialize, Default)]
pub struct LoginForm {
    email: Option<String>,
    password: Option<String>,
}

/// Login action: forward the credentials and store the returned session in a cookie.
///
/// Missing fields are answered locally without contacting the identity API.
#[instrument(skip_all)]
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    let form = form_fields(form);
    let email = form.email.unwrap_or_default();
    if email.is_empty() {
        return fail(
            StatusCode::BAD_REQUEST,
            json!({ "email": email, "missing": true, "field": "email" }),
        );
    }

    let password = match form.password {
        Some(password) if !password.is_empty() => SecretString::from(password),
        _ => {
            return fail(
                StatusCode::BAD_REQUEST,
                json!({ "email": email, "missing": true, "field": "password" }),
            )
        }
    };

    match state.identity().login(&email, &password).await {
        Ok(LoginOutcome::Session(session_id)) => {
            if !valid_session_token(&session_id) {
                error!("Identity API returned a malformed session id");
                return unavailable(email);
            }

            match session_cookie(&session_id, state.cookies().secure()) {
                Ok(cookie) => {
                    info!("login succeeded");
                    let mut response = found("/");
                    response.headers_mut().insert(SET_COOKIE, cookie);
                    response
                }
                Err(err) => {
                    error!("Failed to build session cookie: {err}");
                    unavailable(email)
                }
            }
        }
        Ok(LoginOutcome::NotFound) => fail(
            StatusCode::NOT_FOUND,
            json!({ "email": email, "notFound": true }),
        ),
        Ok(LoginOutcome::Incorrect) => fail(
            StatusCode::UNAUTHORIZED,
            json!({ "email": email, "incorrect": true }),
        ),
        Ok(LoginOutcome::Failed(status)) => {
            error!("Identity API login failed: {status}");
            unavailable(email)
        }
        Err(err) => {
            error!("Error calling identity API login: {err:#}");
            unavailable(email)
        }
    }
}

fn unavailable(email: String) -> Response {
    fail(
        StatusCode::BAD_GATEWAY,
        json!({ "email": email, "unavailable": true }),
    )
}
