//! In-process stand-in for the identity API used by the integration tests.

#![allow(dead_code)]

use anyhow::Result;
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use frontdesk::frontdesk::{identity::IdentityClient, router, AppState, CookieConfig};
use serde_json::{json, Value};
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::net::TcpListener;
use url::Url;

pub const VALID_TOKEN: &str = "abc123";
pub const GARBLED_TOKEN: &str = "garbled";
pub const SESSION_ID: &str = "0b6f1c3e-8a2d-4c1b-9f7e-2d5a6b7c8d9e";
pub const RESET_TOKEN: &str = "good-token";

/// Requests seen by the fake API, as `"METHOD /path"`.
#[derive(Clone, Default)]
pub struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
    fn record(&self, entry: &str) {
        if let Ok(mut calls) = self.0.lock() {
            calls.push(entry.to_string());
        }
    }

    pub fn all(&self) -> Vec<String> {
        self.0.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.all().iter().filter(|call| call.as_str() == entry).count()
    }

    pub fn clear(&self) {
        if let Ok(mut calls) = self.0.lock() {
            calls.clear();
        }
    }
}

pub struct FakeIdentity {
    pub url: Url,
    pub calls: Calls,
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn get_user(State(calls): State<Calls>, headers: HeaderMap) -> Response {
    calls.record("GET /user");
    match bearer(&headers) {
        Some(VALID_TOKEN) => Json(json!({ "name": "Ann", "email": "a@x.com" })).into_response(),
        Some(GARBLED_TOKEN) => (StatusCode::OK, "not json").into_response(),
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn patch_user(
    State(calls): State<Calls>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    calls.record("PATCH /user");
    if bearer(&headers) != Some(VALID_TOKEN) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if body["name"] == "reserved" {
        return StatusCode::CONFLICT.into_response();
    }
    Json(json!({ "name": body["name"], "email": "a@x.com" })).into_response()
}

async fn login(State(calls): State<Calls>, Json(body): Json<Value>) -> Response {
    calls.record("POST /login");
    match (body["email"].as_str(), body["password"].as_str()) {
        (Some("a@x.com"), Some("hunter2")) => {
            Json(json!({ "session_id": SESSION_ID })).into_response()
        }
        (Some("a@x.com"), _) => StatusCode::UNAUTHORIZED.into_response(),
        (Some("evil@x.com"), _) => {
            Json(json!({ "session_id": "x; Domain=evil.tld" })).into_response()
        }
        (Some("broken@x.com"), _) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn register(State(calls): State<Calls>, Json(body): Json<Value>) -> Response {
    calls.record("POST /register");
    if body["email"] == "taken@x.com" {
        StatusCode::CONFLICT.into_response()
    } else {
        Json(json!({ "name": body["name"], "email": body["email"] })).into_response()
    }
}

async fn request_reset(State(calls): State<Calls>, Json(body): Json<Value>) -> StatusCode {
    calls.record("POST /request-reset");
    if body["email"] == "a@x.com" {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn test_reset_token(State(calls): State<Calls>, Json(body): Json<Value>) -> StatusCode {
    calls.record("POST /test-reset-token");
    if body["token"] == RESET_TOKEN {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn reset(State(calls): State<Calls>, Json(body): Json<Value>) -> StatusCode {
    calls.record("POST /reset");
    if body["reset_token"] == RESET_TOKEN && body["new_password"].is_string() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

impl FakeIdentity {
    pub async fn spawn() -> Result<Self> {
        let calls = Calls::default();
        let app = Router::new()
            .route("/", get(|| async { "identity" }))
            .route("/user", get(get_user).patch(patch_user))
            .route("/login", post(login))
            .route("/register", post(register))
            .route("/request-reset", post(request_reset))
            .route("/test-reset-token", post(test_reset_token))
            .route("/reset", post(reset))
            .with_state(calls.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            url: Url::parse(&format!("http://{addr}"))?,
            calls,
        })
    }
}

/// Address nothing listens on: bind an ephemeral port and release it.
pub async fn unreachable_url() -> Result<Url> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    drop(listener);
    Ok(Url::parse(&format!("http://{addr}"))?)
}

/// Identity API that accepts connections and never answers.
pub async fn silent_url() -> Result<Url> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    Ok(Url::parse(&format!("http://{addr}"))?)
}

/// Identity call timeout used by [`app`].
pub const IDENTITY_TIMEOUT: Duration = Duration::from_secs(2);

pub fn app(identity_url: Url) -> Result<Router> {
    let identity = IdentityClient::new(identity_url, IDENTITY_TIMEOUT)?;
    Ok(router(Arc::new(AppState::new(
        identity,
        CookieConfig::new(false),
    ))))
}

pub fn get_request(uri: &str, session: Option<&str>) -> Result<Request<Body>> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(session) = session {
        builder = builder.header("cookie", format!("session={session}"));
    }
    Ok(builder.body(Body::empty())?)
}

pub fn form_request(uri: &str, session: Option<&str>, form: &str) -> Result<Request<Body>> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded");
    if let Some(session) = session {
        builder = builder.header("cookie", format!("session={session}"));
    }
    Ok(builder.body(Body::from(form.to_string()))?)
}

pub fn post_request(uri: &str, content_type: Option<&str>, body: &str) -> Result<Request<Body>> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    Ok(builder.body(Body::from(body.to_string()))?)
}

pub async fn json_body(response: Response) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub fn location(response: &Response) -> Option<&str> {
    response.headers().get("location")?.to_str().ok()
}

pub fn set_cookie(response: &Response) -> Option<&str> {
    response.headers().get("set-cookie")?.to_str().ok()
}
