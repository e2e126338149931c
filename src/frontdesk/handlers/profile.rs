//! Authorized home screen: shows the signed-in user and edits their display name.

use super::{fail, form_fields};
use crate::frontdesk::{
    gate::CurrentUser, identity::User, session::extract_session_token, AppState,
};
use axum::{
    extract::{rejection::FormRejection, Extension, Form},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, instrument};

#[derive(Deserialize, Debug, Default)]
pub struct EditNameForm {
    name: Option<String>,
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
}

pub async fn page(Extension(current): Extension<CurrentUser>) -> Response {
    match current.0 {
        Some(user) => Json(json!({ "user": user })).into_response(),
        None => unauthorized(),
    }
}

#[instrument(skip(state, current, headers))]
pub async fn edit_name(
    Extension(state): Extension<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
    form: Result<Form<EditNameForm>, FormRejection>,
) -> Response {
    let form = form_fields(form);
    let (Some(user), Some(token)) = (current.0, extract_session_token(&headers)) else {
        return unauthorized();
    };

    let name = form.name.unwrap_or_default();
    if name.trim().is_empty() {
        return fail(StatusCode::BAD_REQUEST, json!({ "missing": true }));
    }

    match state.identity().update_name(&token, &name).await {
        Ok(StatusCode::OK) => {
            let user = User {
                name: name.clone(),
                ..user
            };
            Json(json!({
                "status": 200,
                "message": "Profile updated.",
                "name": name,
                "user": user,
            }))
            .into_response()
        }
        Ok(status) => {
            debug!("name update rejected: {status}");
            update_failed(name)
        }
        Err(err) => {
            error!("Error calling identity API update user: {err:#}");
            update_failed(name)
        }
    }
}

fn update_failed(name: String) -> Response {
    fail(
        StatusCode::NOT_FOUND,
        json!({ "status": 404, "message": "An Error occured.", "name": name }),
    )
}
