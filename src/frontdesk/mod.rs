pub mod gate;
pub mod handlers;
pub mod identity;
pub mod session;

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::{HeaderName, HeaderValue, Request},
    middleware,
    routing::{get, post},
    Router,
};
use handlers::{health, login, logout, profile, register, request_reset, reset};
use identity::IdentityClient;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use ulid::Ulid;

/// Cookie attributes that depend on deployment.
#[derive(Clone, Copy, Debug, Default)]
pub struct CookieConfig {
    secure: bool,
}

impl CookieConfig {
    #[must_use]
    pub const fn new(secure: bool) -> Self {
        Self { secure }
    }

    #[must_use]
    pub const fn secure(self) -> bool {
        self.secure
    }
}

/// Shared, read-only state built once at startup and handed to every request.
#[derive(Debug)]
pub struct AppState {
    identity: IdentityClient,
    cookies: CookieConfig,
}

impl AppState {
    #[must_use]
    pub fn new(identity: IdentityClient, cookies: CookieConfig) -> Self {
        Self { identity, cookies }
    }

    #[must_use]
    pub const fn identity(&self) -> &IdentityClient {
        &self.identity
    }

    #[must_use]
    pub const fn cookies(&self) -> CookieConfig {
        self.cookies
    }
}

/// Build the application router.
///
/// Every page route, and the fallback for unknown paths, sits behind the session gate.
/// `/health` is served outside of it.
pub fn router(state: Arc<AppState>) -> Router {
    let pages = Router::new()
        .route("/", get(profile::page).post(profile::edit_name))
        .route("/login", get(handlers::page).post(login::login))
        .route("/register", get(handlers::page).post(register::register))
        .route(
            "/request-reset",
            get(handlers::page).post(request_reset::request_reset),
        )
        .route("/reset", get(reset::page).post(reset::reset_password))
        .route("/logout", post(logout::logout))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(gate::session_gate));

    Router::new()
        .route("/health", get(health::health))
        .merge(pages)
        .layer(Extension(state))
}

/// Start the server
///
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, state: Arc<AppState>) -> Result<()> {
    info!("Identity API: {}", state.identity().base_url());

    let app = router(state).layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span)),
    );

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {err}");
                std::future::pending::<()>().await;
            }
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
