//! Browser dashboard route configuration.

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;
use crate::web::handlers::{
    auth_page_handler, controlboard_handler, index_handler, logout_handler, sign_in_handler,
    toggle_power_handler,
};

/// Control board routes requiring a session cookie.
///
/// Protected via [`crate::web::middleware::web_auth`].
///
/// # Endpoints
///
/// - `GET /controlboard` - Device list with power buttons
/// - `POST /controlboard/devices/{id}/power` - Toggle one device
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/controlboard", get(controlboard_handler))
        .route("/controlboard/devices/{id}/power", post(toggle_power_handler))
}

/// Sign-in and logout routes.
///
/// # Endpoints
///
/// - `GET /` - Redirect to the sign-in page
/// - `GET /auth` - Sign-in page
/// - `POST /auth/callback` - Identity-provider callback
/// - `GET /logout` - End the session
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/auth", get(auth_page_handler))
        .route("/auth/callback", post(sign_in_handler))
        .route("/logout", get(logout_handler))
}
