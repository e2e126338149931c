//! Password reset completion: `GET /reset?token=` validates the token before the form is
//! shown, `POST /reset?token=` submits the new password.

use super::{fail, form_fields};
use crate::frontdesk::AppState;
use axum::{
    extract::{rejection::FormRejection, Extension, Form, Query},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, instrument};

#[derive(Deserialize)]
pub struct ResetQuery {
    token: Option<String>,
}

impl ResetQuery {
    fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.is_empty())
    }
}

#[derive(Deserialize, Default)]
pub struct ResetForm {
    password: Option<String>,
    #[serde(rename = "passwordConfirmed")]
    password_confirmed: Option<String>,
}

fn bad_request() -> Response {
    (StatusCode::BAD_REQUEST, "Bad Request").into_response()
}

#[instrument(skip_all)]
pub async fn page(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<ResetQuery>,
) -> Response {
    let Some(token) = query.token() else {
        return bad_request();
    };

    match state.identity().test_reset_token(token).await {
        Ok(StatusCode::OK) => Json(json!({ "token_valid": true })).into_response(),
        Ok(status) => {
            debug!("reset token rejected: {status}");
            bad_request()
        }
        Err(err) => {
            error!("Error calling identity API test-reset-token: {err:#}");
            bad_request()
        }
    }
}

#[instrument(skip_all)]
pub async fn reset_password(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<ResetQuery>,
    form: Result<Form<ResetForm>, FormRejection>,
) -> Response {
    let form = form_fields(form);
    let Some(token) = query.token() else {
        return bad_request();
    };

    let password = form.password.unwrap_or_default();
    if password.is_empty() {
        return fail(
            StatusCode::BAD_REQUEST,
            json!({ "error": "Password is required", "missing": true }),
        );
    }

    if form.password_confirmed.as_deref() != Some(password.as_str()) {
        return fail(
            StatusCode::BAD_REQUEST,
            json!({ "error": "Passwords do not match" }),
        );
    }

    let password = SecretString::from(password);

    match state.identity().reset_password(token, &password).await {
        Ok(StatusCode::OK) => Json(json!({
            "status": 200,
            "success": "Password reset successful",
        }))
        .into_response(),
        Ok(status) => {
            debug!("password reset rejected: {status}");
            reset_failed()
        }
        Err(err) => {
            error!("Error calling identity API reset: {err:#}");
            reset_failed()
        }
    }
}

fn reset_failed() -> Response {
    fail(
        StatusCode::BAD_REQUEST,
        json!({ "error": "An error occured while resetting your password" }),
    )
}
