//! Page handlers. Each one forwards to the identity API and maps its status to a JSON
//! action result or a redirect.

pub mod health;
pub mod login;
pub mod logout;
pub mod profile;
pub mod register;
pub mod request_reset;
pub mod reset;

use crate::frontdesk::gate::CurrentUser;
use axum::{
    extract::{rejection::FormRejection, Extension, Form},
    http::{header::LOCATION, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use tracing::debug;

/// `302 Found` with the given location.
pub(crate) fn found(location: &'static str) -> Response {
    (
        StatusCode::FOUND,
        [(LOCATION, HeaderValue::from_static(location))],
    )
        .into_response()
}

/// Fields of a urlencoded form. Any other body reads as an empty form so the presence checks
/// answer it.
pub(crate) fn form_fields<T: Default>(form: Result<Form<T>, FormRejection>) -> T {
    match form {
        Ok(Form(fields)) => fields,
        Err(rejection) => {
            debug!("unreadable form body: {rejection}");
            T::default()
        }
    }
}

pub(crate) fn fail(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

/// Page data for the public screens.
pub async fn page(Extension(current): Extension<CurrentUser>) -> Json<Value> {
    Json(json!({ "user": current.0 }))
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}
