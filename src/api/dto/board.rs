//! Board snapshot returned by the device endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::board::{BoardState, DisplayLookups, SessionPhase};
use crate::domain::entities::DeviceMap;

/// The session's board as the API sees it.
///
/// ```json
/// {
///   "phase": "logged_in",
///   "devices": {
///     "5": {"deviceId": 5, "name": "Lamp", "powerOn": true, "buttonCssClass": "power_on"}
///   },
///   "anyDeviceAvailable": true,
///   "lastUpdated": "2026-01-01T10:00:00Z",
///   "alert": null
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub phase: SessionPhase,
    pub devices: DeviceMap,
    pub any_device_available: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub alert: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayLookups>,
}

impl BoardSnapshot {
    /// Captures the board and consumes its pending alert.
    pub fn take(board: &mut BoardState) -> Self {
        Self {
            phase: board.phase(),
            devices: board.devices().clone(),
            any_device_available: board.is_any_device_available(),
            last_updated: board.last_updated(),
            alert: board.take_alert(),
            display: board.display().cloned(),
        }
    }
}
