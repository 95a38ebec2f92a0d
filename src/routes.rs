//! Top-level router configuration combining API and web routes.
//!
//! # Route Structure
//!
//! - `GET  /`              - Redirect to the sign-in page
//! - `GET  /auth`          - Sign-in page (public)
//! - `POST /auth/callback` - Identity-provider callback (public)
//! - `GET  /logout`        - End the session (public)
//! - `/controlboard*`      - Control board pages (session cookie required)
//! - `/api/*`              - JSON API (session cookie or Authorization header)
//! - `GET  /health`        - Health check (public)
//! - `/static/*`           - Static assets
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket
//! - **Authentication** - Session cookie (web) or cookie/header (API)
//! - **Path normalization** - Trailing slash handling

use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use crate::web;
use crate::web::middleware::web_auth;

/// Builds the routes and per-route middleware.
///
/// Rate limiting keys on the peer address, so it needs the server's connect
/// info; pass `rate_limited = false` when driving the router without a
/// socket (tests, `oneshot`).
pub fn router(state: AppState, rate_limited: bool) -> Router {
    let mut api_router =
        api::routes::protected_routes().route_layer(middleware::from_fn(auth::layer));

    let mut board_router =
        web::routes::protected_routes().route_layer(middleware::from_fn(web_auth::layer));

    let mut public_router = web::routes::public_routes();

    if rate_limited {
        api_router = api_router.layer(rate_limit::secure_layer());
        board_router = board_router.layer(rate_limit::secure_layer());
        public_router = public_router.layer(rate_limit::layer());
    }

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .merge(board_router)
        .merge(public_router)
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the served application: rate-limited routes with trailing
/// slashes trimmed.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state, true))
}
