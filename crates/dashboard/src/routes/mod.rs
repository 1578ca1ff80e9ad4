//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - 200 once users are loaded, 503 otherwise
//!
//! # Dashboard
//! GET  /                       - User cards with search (?q=)
//! POST /reload                 - Retry/refresh the remote load
//!
//! # Users
//! GET  /users/new              - Add-user form
//! POST /users                  - Submit add-user form
//! GET  /users/{id}             - User detail (store first, then remote)
//!
//! # JSON API
//! GET  /api/users              - Search users (?q=)
//! POST /api/users              - Add a user
//! GET  /api/users/{id}         - Look up one user
//! ```

pub mod api;
pub mod dashboard;
pub mod users;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::{AppState, LoadStatus};

/// Create the user page routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(users::create))
        .route("/new", get(users::new_form))
        .route("/{id}", get(users::show))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(api::list).post(api::create))
        .route("/{id}", get(api::show))
}

/// Create all page and API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/reload", post(dashboard::reload))
        .nest("/users", user_routes())
        .nest("/api/users", api_routes())
}

/// Build the full application: health checks, routes, static assets, and
/// request tracing, bound to `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service(
            "/static",
            ServeDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        #[allow(clippy::cast_possible_truncation)]
                        span.record("latency_ms", latency.as_millis() as u64);
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable until a load has succeeded.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.status().await {
        LoadStatus::Ready => StatusCode::OK,
        LoadStatus::Loading | LoadStatus::Failed(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
