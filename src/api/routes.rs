//! API route configuration.
//!
//! All API endpoints require a session via [`crate::api::middleware::auth`].

use axum::{
    Router,
    routing::{get, put},
};

use crate::api::handlers::{devices_handler, power_handler};
use crate::state::AppState;

/// Session-protected API routes.
///
/// # Endpoints
///
/// - `GET /devices`            - Current board snapshot
/// - `PUT /devices/{id}/power` - Toggle one device and return the new snapshot
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/devices", get(devices_handler))
        .route("/devices/{id}/power", put(power_handler))
}
