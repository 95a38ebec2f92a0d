//! Cancellable per-session poll loop.
//!
//! Waits one interval, re-reads the controller, and repeats until the
//! session is cancelled or the controller rejects it. Errors that do not end
//! the session leave an alert and polling continues.

use std::sync::Arc;
use tracing::{debug, info};

use crate::application::services::board_service::BoardService;
use crate::application::services::session_registry::SessionContext;
use crate::domain::board::SessionPhase;

/// Why a poller returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    /// Stopped from outside (logout, expiry, shutdown).
    Cancelled,
    /// The controller rejected the session.
    LoggedOut,
}

/// Runs the poll loop for `ctx` until it is cancelled or logged out.
pub async fn run(service: Arc<BoardService>, ctx: Arc<SessionContext>) -> PollExit {
    let interval = service.poll_interval();
    let fingerprint = ctx.session().fingerprint();
    let cancel = ctx.cancel_token().clone();

    info!(session = %fingerprint, "poller started (interval={interval:?})");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!(session = %fingerprint, "poller stopped");
                return PollExit::Cancelled;
            }
            _ = tokio::time::sleep(interval) => {
                if let Err(err) = service.list_devices(&ctx).await {
                    debug!(session = %fingerprint, error = %err, "poll failed");
                }

                if ctx.phase().await == SessionPhase::LoggedOut {
                    info!(session = %fingerprint, "poller ended: session no longer valid");
                    return PollExit::LoggedOut;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Controller, Session};
    use crate::domain::gateways::MockControllerGateway;
    use crate::error::ControllerError;
    use serde_json::json;
    use std::time::Duration;

    fn context() -> Arc<SessionContext> {
        Arc::new(SessionContext::new(
            Session::new("tok-1"),
            chrono::Duration::minutes(10),
        ))
    }

    fn service(gateway: MockControllerGateway) -> Arc<BoardService> {
        Arc::new(BoardService::new(
            Arc::new(gateway),
            "ctrl-1",
            Duration::from_secs(10),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_unauthorized_stops_polling() {
        let mut gateway = MockControllerGateway::new();
        gateway.expect_get_controller().times(1).returning(|_, _| {
            Err(ControllerError::from_response(
                401,
                json!({"code": 401, "message": "Unauthorized"}),
            ))
        });

        let ctx = context();
        let exit = run(service(gateway), ctx.clone()).await;

        assert_eq!(exit, PollExit::LoggedOut);
        assert_eq!(ctx.phase().await, SessionPhase::LoggedOut);
        assert!(ctx.cancel_token().is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_message_stops_polling_after_transient_errors() {
        let mut gateway = MockControllerGateway::new();
        let mut calls = 0;
        gateway.expect_get_controller().times(3).returning(move |_, _| {
            calls += 1;
            match calls {
                1 => Err(ControllerError::Transport("timed out".into())),
                2 => Ok(Controller::default()),
                _ => Err(ControllerError::from_response(
                    500,
                    json!({"code": 500, "message": "Session token failed security check"}),
                )),
            }
        });

        let ctx = context();
        let exit = run(service(gateway), ctx.clone()).await;

        assert_eq!(exit, PollExit::LoggedOut);
        assert_eq!(ctx.phase().await, SessionPhase::LoggedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_first_tick_makes_no_requests() {
        let mut gateway = MockControllerGateway::new();
        gateway.expect_get_controller().times(0);

        let ctx = context();
        ctx.stop();

        let exit = run(service(gateway), ctx).await;
        assert_eq!(exit, PollExit::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_on_interval_until_cancelled() {
        let mut gateway = MockControllerGateway::new();
        gateway.expect_get_controller().times(3).returning(|_, _| {
            Ok(serde_json::from_value(json!({"id": "ctrl-1", "pins": [{"id": 1, "name": "Lamp"}]}))
                .unwrap())
        });

        let ctx = context();
        let handle = tokio::spawn(run(service(gateway), ctx.clone()));

        tokio::time::sleep(Duration::from_secs(35)).await;
        ctx.stop();

        assert_eq!(handle.await.unwrap(), PollExit::Cancelled);
        assert!(ctx.board().read().await.is_any_device_available());
    }
}
