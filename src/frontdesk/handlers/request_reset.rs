use super::{fail, form_fields};
use crate::frontdesk::AppState;
use axum::{
    extract::{rejection::FormRejection, Extension, Form},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, instrument};

#[derive(Deserialize, Debug, Default)]
pub struct RequestResetForm {
    email: Option<String>,
}

/// Ask the identity API to mail a reset token.
#[instrument(skip(state))]
pub async fn request_reset(
    Extension(state): Extension<Arc<AppState>>,
    form: Result<Form<RequestResetForm>, FormRejection>,
) -> Response {
    let form = form_fields(form);
    let email = form.email.unwrap_or_default();
    if email.is_empty() {
        return fail(StatusCode::BAD_REQUEST, json!({ "missing": true }));
    }

    let status = match state.identity().request_reset(&email).await {
        Ok(status) => Some(status),
        Err(err) => {
            error!("Error calling identity API request-reset: {err:#}");
            None
        }
    };

    if status == Some(StatusCode::OK) {
        Json(json!({ "status": 200, "message": "Email sent." })).into_response()
    } else {
        debug!("reset request not accepted: {status:?}");
        fail(
            StatusCode::NOT_FOUND,
            json!({ "status": 404, "message": "An Error occured.", "email": email }),
        )
    }
}
