//! Control-board service: reads, polls and toggles controller pins.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::application::services::poller::{self, PollExit};
use crate::application::services::session_registry::{SessionContext, SessionRegistry};
use crate::domain::board::SessionPhase;
use crate::domain::entities::{ControllerUpdate, Device, DeviceMap, Session};
use crate::domain::gateways::ControllerGateway;
use crate::error::ControllerError;

/// Result of opening a board for a request.
pub enum BoardAccess {
    /// The session is signed in; render from this context.
    Ready(Arc<SessionContext>),
    /// The session ended; the caller must redirect to logout.
    LoggedOut,
}

/// Orchestrates controller calls for a session's board.
///
/// Every failure leaves an alert on the board. Failures that carry the
/// unauthorized code or an invalid-session message also end the session
/// and stop its poller.
pub struct BoardService {
    gateway: Arc<dyn ControllerGateway>,
    controller_id: String,
    poll_interval: Duration,
}

impl BoardService {
    pub fn new(
        gateway: Arc<dyn ControllerGateway>,
        controller_id: impl Into<String>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            gateway,
            controller_id: controller_id.into(),
            poll_interval,
        }
    }

    pub fn controller_id(&self) -> &str {
        &self.controller_id
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Finds or creates the session's board and initialises it once.
    ///
    /// A failed initialisation that did not end the session is retried on
    /// the next call.
    pub async fn open(
        self: &Arc<Self>,
        registry: &SessionRegistry,
        session: Session,
    ) -> BoardAccess {
        let token = session.token.clone();
        let ctx = registry.get_or_insert(session).await;

        {
            let _guard = ctx.init_guard().lock().await;
            if ctx.phase().await == SessionPhase::Authenticating
                && let Err(err) = self.init(&ctx).await
            {
                debug!(error = %err, "board initialisation failed");
            }
        }

        if ctx.phase().await == SessionPhase::LoggedOut {
            registry.remove(&token).await;
            return BoardAccess::LoggedOut;
        }

        BoardAccess::Ready(ctx)
    }

    /// Reads the controller, fills the board, starts polling and sets up the
    /// display lookups.
    ///
    /// The initial read doubles as the first periodic fetch.
    ///
    /// # Errors
    ///
    /// Returns the controller error after recording it on the board.
    pub async fn init(self: &Arc<Self>, ctx: &Arc<SessionContext>) -> Result<(), ControllerError> {
        let session = ctx.session();

        let controller = match self
            .gateway
            .get_controller(&session.token, &self.controller_id)
            .await
        {
            Ok(controller) => controller,
            Err(err) => {
                self.handle_failure(ctx, &err).await;
                return Err(err);
            }
        };

        {
            let mut board = ctx.board().write().await;
            board.replace_devices(&controller, Utc::now());
            board.init_display();
            board.mark_logged_in();
        }

        info!(
            session = %session.fingerprint(),
            pins = controller.pins.len(),
            "control board initialised"
        );

        let _poller = self.start_polling(ctx);
        Ok(())
    }

    /// Spawns the session's poller.
    pub fn start_polling(
        self: &Arc<Self>,
        ctx: &Arc<SessionContext>,
    ) -> tokio::task::JoinHandle<PollExit> {
        tokio::spawn(poller::run(Arc::clone(self), Arc::clone(ctx)))
    }

    /// Re-reads the controller and replaces the whole device map.
    ///
    /// # Errors
    ///
    /// Returns the controller error after recording it on the board.
    pub async fn list_devices(&self, ctx: &SessionContext) -> Result<DeviceMap, ControllerError> {
        metrics::counter!("controlboard_polls_total").increment(1);

        match self
            .gateway
            .get_controller(&ctx.session().token, &self.controller_id)
            .await
        {
            Ok(controller) => {
                let mut board = ctx.board().write().await;
                board.replace_devices(&controller, Utc::now());
                debug!(devices = board.devices().len(), "done fetching devices");
                Ok(board.devices().clone())
            }
            Err(err) => {
                self.handle_failure(ctx, &err).await;
                Err(err)
            }
        }
    }

    /// Flips `device` and merges the controller's echo into the board.
    ///
    /// # Errors
    ///
    /// Returns the controller error after recording it on the board.
    pub async fn power_handler(
        &self,
        ctx: &SessionContext,
        device: &Device,
    ) -> Result<DeviceMap, ControllerError> {
        metrics::counter!("controlboard_toggles_total").increment(1);

        let value = device.toggled_value();
        let update = ControllerUpdate::single_pin(&self.controller_id, device.device_id, value);

        info!(
            session = %ctx.session().fingerprint(),
            device_id = device.device_id,
            value = %update.pins[0].value,
            "toggling device"
        );

        match self
            .gateway
            .update_controller(&ctx.session().token, &update)
            .await
        {
            Ok(controller) => {
                let mut board = ctx.board().write().await;
                board.merge_devices(&controller, Utc::now());
                Ok(board.devices().clone())
            }
            Err(err) => {
                self.handle_failure(ctx, &err).await;
                Err(err)
            }
        }
    }

    async fn handle_failure(&self, ctx: &SessionContext, err: &ControllerError) {
        warn!(
            session = %ctx.session().fingerprint(),
            error = %err,
            "controller request failed"
        );

        let mut board = ctx.board().write().await;
        board.record_alert(err.alert_message());

        if err.forces_logout() {
            metrics::counter!("controlboard_forced_logouts_total").increment(1);
            info!(
                session = %ctx.session().fingerprint(),
                "session rejected by controller, logging out"
            );
            board.mark_logged_out();
            ctx.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Controller, PinValue};
    use crate::domain::gateways::MockControllerGateway;
    use serde_json::json;

    const CONTROLLER_ID: &str = "ctrl-1";

    fn controller(pins: serde_json::Value) -> Controller {
        serde_json::from_value(json!({ "id": CONTROLLER_ID, "pins": pins })).unwrap()
    }

    fn service(gateway: MockControllerGateway) -> Arc<BoardService> {
        Arc::new(BoardService::new(
            Arc::new(gateway),
            CONTROLLER_ID,
            Duration::from_secs(3600),
        ))
    }

    fn context() -> Arc<SessionContext> {
        Arc::new(SessionContext::new(
            Session::new("tok-1"),
            chrono::Duration::minutes(10),
        ))
    }

    fn unauthorized() -> ControllerError {
        ControllerError::from_response(401, json!({"code": 401, "message": "Unauthorized"}))
    }

    #[tokio::test]
    async fn test_list_devices_replaces_map() {
        let mut gateway = MockControllerGateway::new();
        gateway
            .expect_get_controller()
            .withf(|token, id| token == "tok-1" && id == CONTROLLER_ID)
            .times(1)
            .returning(|_, _| Ok(controller(json!([{"id": 1, "name": "Lamp", "value": "Low"}]))));

        let service = service(gateway);
        let ctx = context();

        let devices = service.list_devices(&ctx).await.unwrap();

        assert_eq!(devices.len(), 1);
        assert!(!devices["1"].power_on);
        assert!(ctx.board().read().await.last_updated().is_some());
    }

    #[tokio::test]
    async fn test_list_devices_error_records_alert_only() {
        let mut gateway = MockControllerGateway::new();
        gateway.expect_get_controller().times(1).returning(|_, _| {
            Err(ControllerError::from_response(
                500,
                json!({"code": 500, "message": "relay board offline"}),
            ))
        });

        let service = service(gateway);
        let ctx = context();

        assert!(service.list_devices(&ctx).await.is_err());

        let mut board = ctx.board().write().await;
        assert_eq!(board.take_alert().as_deref(), Some("relay board offline"));
        assert_eq!(board.phase(), SessionPhase::Authenticating);
        assert!(!ctx.cancel_token().is_cancelled());
    }

    #[tokio::test]
    async fn test_power_on_device_writes_low_for_that_pin_only() {
        let mut gateway = MockControllerGateway::new();
        gateway
            .expect_update_controller()
            .withf(|token, update| {
                token == "tok-1"
                    && update.id == CONTROLLER_ID
                    && update.pins.len() == 1
                    && update.pins[0].id == 7
                    && update.pins[0].value == PinValue::Low
            })
            .times(1)
            .returning(|_, _| Ok(controller(json!([{"id": 7, "name": "Lamp", "value": "Low"}]))));

        let service = service(gateway);
        let ctx = context();
        let device = Device {
            device_id: 7,
            name: "Lamp".into(),
            power_on: true,
            button_css_class: "power_on".into(),
        };

        let devices = service.power_handler(&ctx, &device).await.unwrap();

        assert!(!devices["7"].power_on);
        assert_eq!(devices["7"].button_css_class, "power_off");
    }

    #[tokio::test]
    async fn test_power_off_device_writes_high() {
        let mut gateway = MockControllerGateway::new();
        gateway
            .expect_update_controller()
            .withf(|_, update| update.pins[0].id == 3 && update.pins[0].value == PinValue::High)
            .times(1)
            .returning(|_, _| Ok(controller(json!([{"id": 3, "name": "Fan", "value": "High"}]))));

        let service = service(gateway);
        let ctx = context();
        let device = Device {
            device_id: 3,
            name: "Fan".into(),
            power_on: false,
            button_css_class: "power_off".into(),
        };

        let devices = service.power_handler(&ctx, &device).await.unwrap();
        assert!(devices["3"].power_on);
    }

    #[tokio::test]
    async fn test_unauthorized_toggle_forces_logout() {
        let mut gateway = MockControllerGateway::new();
        gateway
            .expect_update_controller()
            .times(1)
            .returning(|_, _| Err(unauthorized()));

        let service = service(gateway);
        let ctx = context();
        let device = Device {
            device_id: 1,
            name: "Lamp".into(),
            power_on: false,
            button_css_class: "power_off".into(),
        };

        let err = service.power_handler(&ctx, &device).await.unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(ctx.phase().await, SessionPhase::LoggedOut);
        assert!(ctx.cancel_token().is_cancelled());
    }

    #[tokio::test]
    async fn test_open_initialises_once() {
        let mut gateway = MockControllerGateway::new();
        gateway
            .expect_get_controller()
            .times(1)
            .returning(|_, _| Ok(controller(json!([{"id": 1, "name": "Lamp", "value": "High"}]))));

        let service = service(gateway);
        let registry = SessionRegistry::new(Duration::from_secs(600));

        let BoardAccess::Ready(first) = service.open(&registry, Session::new("tok-1")).await else {
            panic!("expected ready board");
        };
        let BoardAccess::Ready(second) = service.open(&registry, Session::new("tok-1")).await else {
            panic!("expected ready board");
        };

        assert!(Arc::ptr_eq(&first, &second));
        let board = first.board().read().await;
        assert_eq!(board.phase(), SessionPhase::LoggedIn);
        assert!(board.display().is_some());
        assert!(board.device(1).unwrap().power_on);

        first.stop();
    }

    #[tokio::test]
    async fn test_open_with_rejected_session_logs_out() {
        let mut gateway = MockControllerGateway::new();
        gateway
            .expect_get_controller()
            .times(1)
            .returning(|_, _| Err(unauthorized()));

        let service = service(gateway);
        let registry = SessionRegistry::new(Duration::from_secs(600));

        let access = service.open(&registry, Session::new("tok-1")).await;

        assert!(matches!(access, BoardAccess::LoggedOut));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_open_retries_after_transient_init_failure() {
        let mut gateway = MockControllerGateway::new();
        let mut calls = 0;
        gateway.expect_get_controller().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Err(ControllerError::Transport("connection refused".into()))
            } else {
                Ok(controller(json!([])))
            }
        });

        let service = service(gateway);
        let registry = SessionRegistry::new(Duration::from_secs(600));

        let BoardAccess::Ready(ctx) = service.open(&registry, Session::new("tok-1")).await else {
            panic!("expected ready board");
        };
        assert_eq!(ctx.phase().await, SessionPhase::Authenticating);
        assert!(ctx.board().read().await.alert().is_some());

        service.open(&registry, Session::new("tok-1")).await;
        assert_eq!(ctx.phase().await, SessionPhase::LoggedIn);
        assert!(!ctx.board().read().await.is_any_device_available());

        ctx.stop();
    }
}
