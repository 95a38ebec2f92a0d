//! Control board page and its toggle form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::debug;

use crate::application::services::{BoardAccess, SessionContext};
use crate::domain::board::SessionPhase;
use crate::domain::entities::{Device, Session};
use crate::state::AppState;
use crate::web::{CONTROL_BOARD_PATH, LOGOUT_PATH};

/// Renders `templates/controlboard.html`.
///
/// The page refreshes itself every poll interval so the browser picks up
/// what the session's poller fetched.
#[derive(Template, WebTemplate)]
#[template(path = "controlboard.html")]
struct ControlBoardTemplate {
    user: String,
    email: String,
    devices: Vec<Device>,
    any_device_available: bool,
    alert: Option<String>,
    last_updated: Option<String>,
    refresh_seconds: u64,
}

async fn open_board(state: &AppState, session: Session) -> Option<Arc<SessionContext>> {
    match state.board_service.open(&state.sessions, session).await {
        BoardAccess::Ready(ctx) => Some(ctx),
        BoardAccess::LoggedOut => None,
    }
}

/// Renders the board, initialising it on the session's first visit.
///
/// # Endpoint
///
/// `GET /controlboard`
pub async fn controlboard_handler(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Response {
    let Some(ctx) = open_board(&state, session).await else {
        return Redirect::to(LOGOUT_PATH).into_response();
    };

    let mut board = ctx.board().write().await;
    let session = ctx.session();

    ControlBoardTemplate {
        user: session.display_name().to_string(),
        email: session.email.clone().unwrap_or_default(),
        devices: board.sorted_devices(),
        any_device_available: board.is_any_device_available(),
        alert: board.take_alert(),
        last_updated: board
            .last_updated()
            .map(|at| at.format("%H:%M:%S UTC").to_string()),
        refresh_seconds: state.board_service.poll_interval().as_secs().max(1),
    }
    .into_response()
}

/// Flips one device and redisplays the board.
///
/// # Endpoint
///
/// `POST /controlboard/devices/{id}/power`
///
/// Failures surface as the board's alert; a failure that ends the session
/// redirects to `/logout` instead.
pub async fn toggle_power_handler(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(device_id): Path<i64>,
) -> Redirect {
    let Some(ctx) = open_board(&state, session).await else {
        return Redirect::to(LOGOUT_PATH);
    };

    match ctx.device(device_id).await {
        Some(device) => {
            if let Err(err) = state.board_service.power_handler(&ctx, &device).await {
                debug!(device_id, error = %err, "toggle failed");
            }
        }
        None => {
            ctx.board()
                .write()
                .await
                .record_alert(format!("Device {device_id} is not on this board"));
        }
    }

    if ctx.phase().await == SessionPhase::LoggedOut {
        state.sessions.remove(&ctx.session().token).await;
        return Redirect::to(LOGOUT_PATH);
    }

    Redirect::to(CONTROL_BOARD_PATH)
}
