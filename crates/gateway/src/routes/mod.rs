//! HTTP route handlers for the gateway.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (probes the upstream)
//!
//! # Content
//! GET  /api/magazines           - Full catalog (sample catalog on failure)
//! GET  /api/magazines/{id}      - Single item (placeholder on failure)
//!
//! # Auth
//! POST /api/auth/login          - Login (demo session on failure in demo mode)
//! POST /api/auth/signup         - Signup (demo session on failure in demo mode)
//! POST /api/auth/reset-password - Password reset (never degrades)
//! ```
//!
//! Content and auth handlers respond 200 with an envelope body even when
//! the upstream fails; only client validation mistakes produce an HTTP
//! error status.

pub mod auth;
pub mod content;

use axum::{
    Router,
    extract::{Request, State},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the content routes router.
pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(content::list))
        .route("/{id}", get(content::detail))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .route("/reset-password", post(auth::reset_password))
}

/// Create all routes for the gateway.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/magazines", content_routes())
        .nest("/api/auth", auth_routes())
}

/// Assemble the full application: routes plus the middleware stack.
///
/// Sentry's tower layers are added in `main`, outermost, so tests can
/// drive this router without a Sentry client.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .layer(CorsLayer::permissive())
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
/// Probes the upstream content API. Content endpoints degrade to sample
/// data instead of failing, so the gateway stays ready either way; the
/// body distinguishes "ok" from "degraded" for operators.
async fn readiness(State(state): State<AppState>) -> &'static str {
    match state.upstream().list_content().await {
        Ok(_) => "ok",
        Err(err) => {
            tracing::warn!(error = %err, "Upstream unreachable, serving degraded");
            "degraded"
        }
    }
}
