//! Handlers for the device endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde_json::json;
use std::sync::Arc;

use crate::api::dto::board::BoardSnapshot;
use crate::application::services::{BoardAccess, SessionContext};
use crate::domain::entities::Session;
use crate::error::AppError;
use crate::state::AppState;

async fn open_board(state: &AppState, session: Session) -> Result<Arc<SessionContext>, AppError> {
    match state.board_service.open(&state.sessions, session).await {
        BoardAccess::Ready(ctx) => Ok(ctx),
        BoardAccess::LoggedOut => Err(AppError::unauthorized(
            "Session expired",
            json!({"logout_url": state.auth_service.logout_redirect_url()}),
        )),
    }
}

/// Returns the session's board, initialising it on first use.
///
/// # Endpoint
///
/// `GET /api/devices`
///
/// # Errors
///
/// Returns `401 Unauthorized` when the controller ended the session.
pub async fn devices_handler(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Json<BoardSnapshot>, AppError> {
    let ctx = open_board(&state, session).await?;
    let mut board = ctx.board().write().await;
    Ok(Json(BoardSnapshot::take(&mut board)))
}

/// Flips one device and returns the updated board.
///
/// # Endpoint
///
/// `PUT /api/devices/{id}/power`
///
/// # Errors
///
/// - `404 Not Found` if the device is not on the board
/// - `401 Unauthorized` if the controller ended the session
/// - `502 Bad Gateway` for any other controller failure
pub async fn power_handler(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(device_id): Path<i64>,
) -> Result<Json<BoardSnapshot>, AppError> {
    let ctx = open_board(&state, session).await?;

    let device = ctx.device(device_id).await.ok_or_else(|| {
        AppError::not_found("Device not found", json!({"device_id": device_id}))
    })?;

    if let Err(err) = state.board_service.power_handler(&ctx, &device).await {
        if err.forces_logout() {
            state.sessions.remove(&ctx.session().token).await;
        }
        // The caller gets the error now; don't repeat it on the next read.
        ctx.board().write().await.take_alert();
        return Err(err.into());
    }

    let mut board = ctx.board().write().await;
    Ok(Json(BoardSnapshot::take(&mut board)))
}
