use super::{fail, form_fields, found};
use crate::frontdesk::{gate::LOGIN_PATH, AppState};
use axum::{
    extract::{rejection::FormRejection, Extension, Form},
    http::StatusCode,
    response::Response,
};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, instrument};

#[derive(Deserialize, Default)]
pub struct RegisterForm {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

#[instrument(skip_all)]
pub async fn register(
    Extension(state): Extension<Arc<AppState>>,
    form: Result<Form<RegisterForm>, FormRejection>,
) -> Response {
    let form = form_fields(form);
    let name = form.name.unwrap_or_default();
    let email = form.email.unwrap_or_default();
    let password = form.password.unwrap_or_default();

    let missing = [("name", &name), ("email", &email), ("password", &password)]
        .into_iter()
        .find_map(|(field, value)| value.trim().is_empty().then_some(field));

    if let Some(field) = missing {
        return fail(
            StatusCode::BAD_REQUEST,
            json!({ "email": email, "missing": true, "field": field }),
        );
    }

    let password = SecretString::from(password);

    match state.identity().register(&name, &email, &password).await {
        Ok(StatusCode::OK | StatusCode::CREATED) => found(LOGIN_PATH),
        Ok(status) => {
            debug!("Identity API rejected registration: {status}");
            failed(email)
        }
        Err(err) => {
            error!("Error calling identity API register: {err:#}");
            failed(email)
        }
    }
}

fn failed(email: String) -> Response {
    fail(
        StatusCode::BAD_REQUEST,
        json!({ "email": email, "error": "Registration failed." }),
    )
}
