//! Handler for health check endpoint.

use axum::{Json, extract::State};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health with the configured controller and live sessions.
///
/// # Endpoint
///
/// `GET /health`
///
/// The controller itself is not contacted: every controller call needs a
/// user's ID token.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "controller": {"status": "ok", "message": "Controller bfd8dd0a"},
///     "sessions": {"status": "ok", "message": "2 active"}
///   }
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let controller = CheckStatus::ok(format!(
        "Controller {}",
        state.board_service.controller_id()
    ));
    let sessions = CheckStatus::ok(format!("{} active", state.sessions.len().await));

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            controller,
            sessions,
        },
    })
}
