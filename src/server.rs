//! HTTP server initialization and runtime setup.
//!
//! Builds the controller client and services, starts the session janitor and
//! runs the Axum server until Ctrl+C.

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::application::services::{
    AuthService, BoardService, SessionRegistry, run_session_janitor,
};
use crate::config::Config;
use crate::infrastructure::HttpControllerClient;
use crate::routes::app_router;
use crate::state::AppState;
use crate::web::cookies::CookiePolicy;

const JANITOR_INTERVAL: Duration = Duration::from_secs(60);

/// Wires the services from `config` into shared state.
///
/// # Errors
///
/// Returns an error if the controller client cannot be built.
pub fn build_state(config: &Config) -> Result<AppState> {
    let gateway = HttpControllerClient::new(&config.backend_url, config.request_timeout())
        .context("Failed to build controller client")?;

    let board_service = Arc::new(BoardService::new(
        Arc::new(gateway),
        config.controller_id.clone(),
        config.poll_interval(),
    ));

    let auth_service = Arc::new(AuthService::new(
        config.idp_client_id.clone(),
        config.logout_url.clone(),
        config.app_base_url.clone(),
    ));

    let cookies = Arc::new(CookiePolicy::new(
        config.cookie_domain.clone(),
        config.session_ttl(),
        config.app_base_url.starts_with("https://"),
    ));

    Ok(AppState {
        auth_service,
        board_service,
        sessions: Arc::new(SessionRegistry::new(config.session_ttl())),
        cookies,
    })
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Controller REST client
/// - Session registry and its janitor
/// - Axum HTTP server with graceful shutdown
///
/// On shutdown every session poller is stopped.
///
/// # Errors
///
/// Returns an error if:
/// - The controller client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config)?;
    let sessions = Arc::clone(&state.sessions);

    let janitor_cancel = CancellationToken::new();
    tokio::spawn(run_session_janitor(
        Arc::clone(&sessions),
        JANITOR_INTERVAL,
        janitor_cancel.clone(),
    ));

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    janitor_cancel.cancel();
    sessions.shutdown().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    tracing::info!("Shutdown signal received");
}
