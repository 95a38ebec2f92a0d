//! Per-session board state and its update functions.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::entities::{Controller, Device, DeviceMap, device_map};

/// Where a session is in its lifecycle.
///
/// `LoggedOut -> Authenticating -> LoggedIn -> LoggedOut`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Authenticating,
    LoggedIn,
    LoggedOut,
}

/// Static lookup lists for the scheduling selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayLookups {
    pub hours: Vec<u8>,
    pub mins: Vec<u8>,
    pub statuses: Vec<&'static str>,
}

impl Default for DisplayLookups {
    fn default() -> Self {
        Self {
            hours: (0..24).collect(),
            mins: (0..60).collect(),
            statuses: vec!["ON", "OFF"],
        }
    }
}

/// What the dashboard shows for one session.
///
/// Devices only ever come from the last successful controller response.
#[derive(Debug, Clone)]
pub struct BoardState {
    phase: SessionPhase,
    devices: DeviceMap,
    display: Option<DisplayLookups>,
    last_updated: Option<DateTime<Utc>>,
    alert: Option<String>,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardState {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Authenticating,
            devices: DeviceMap::new(),
            display: None,
            last_updated: None,
            alert: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn devices(&self) -> &DeviceMap {
        &self.devices
    }

    pub fn device(&self, device_id: i64) -> Option<&Device> {
        self.devices.get(&device_id.to_string())
    }

    /// Devices ordered by numeric id for rendering.
    pub fn sorted_devices(&self) -> Vec<Device> {
        let mut devices: Vec<Device> = self.devices.values().cloned().collect();
        devices.sort_by_key(|d| d.device_id);
        devices
    }

    pub fn display(&self) -> Option<&DisplayLookups> {
        self.display.as_ref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn is_any_device_available(&self) -> bool {
        !self.devices.is_empty()
    }

    pub fn mark_logged_in(&mut self) {
        if self.phase != SessionPhase::LoggedOut {
            self.phase = SessionPhase::LoggedIn;
        }
    }

    /// Terminal: nothing moves a session out of `LoggedOut`.
    pub fn mark_logged_out(&mut self) {
        self.phase = SessionPhase::LoggedOut;
    }

    pub fn init_display(&mut self) {
        self.display = Some(DisplayLookups::default());
    }

    /// Discards the current map and rebuilds it from `controller`.
    pub fn replace_devices(&mut self, controller: &Controller, at: DateTime<Utc>) {
        self.devices = device_map(controller);
        self.last_updated = Some(at);
    }

    /// Overwrites the entries for every pin in `controller`, keeping the rest.
    pub fn merge_devices(&mut self, controller: &Controller, at: DateTime<Utc>) {
        self.devices.extend(device_map(controller));
        self.last_updated = Some(at);
    }

    pub fn record_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
    }

    /// Returns the pending alert and clears it so it is shown once.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn controller(pins: serde_json::Value) -> Controller {
        serde_json::from_value(json!({ "id": "c", "pins": pins })).unwrap()
    }

    #[test]
    fn test_replace_discards_previous_devices() {
        let mut board = BoardState::new();
        board.replace_devices(
            &controller(json!([{"id": 1, "name": "A", "value": "High"}, {"id": 2, "name": "B"}])),
            Utc::now(),
        );
        board.replace_devices(&controller(json!([{"id": 2, "name": "B"}])), Utc::now());

        assert_eq!(board.devices().len(), 1);
        assert!(board.device(1).is_none());
        assert!(board.is_any_device_available());
    }

    #[test]
    fn test_merge_only_touches_returned_pins() {
        let mut board = BoardState::new();
        board.replace_devices(
            &controller(json!([{"id": 1, "name": "A"}, {"id": 2, "name": "B"}])),
            Utc::now(),
        );
        board.merge_devices(
            &controller(json!([{"id": 2, "name": "B", "value": "High"}])),
            Utc::now(),
        );

        assert_eq!(board.devices().len(), 2);
        assert!(board.device(2).unwrap().power_on);
        assert!(!board.device(1).unwrap().power_on);
    }

    #[test]
    fn test_sorted_devices_use_numeric_order() {
        let mut board = BoardState::new();
        board.replace_devices(
            &controller(json!([{"id": 10, "name": "J"}, {"id": 2, "name": "B"}])),
            Utc::now(),
        );

        let ids: Vec<i64> = board.sorted_devices().iter().map(|d| d.device_id).collect();
        assert_eq!(ids, vec![2, 10]);
    }

    #[test]
    fn test_alert_is_taken_once() {
        let mut board = BoardState::new();
        board.record_alert("boom");

        assert_eq!(board.take_alert().as_deref(), Some("boom"));
        assert!(board.take_alert().is_none());
    }

    #[test]
    fn test_logged_out_is_terminal() {
        let mut board = BoardState::new();
        board.mark_logged_out();
        board.mark_logged_in();

        assert_eq!(board.phase(), SessionPhase::LoggedOut);
    }

    #[test]
    fn test_display_lookups() {
        let lookups = DisplayLookups::default();
        assert_eq!(lookups.hours.len(), 24);
        assert_eq!(lookups.hours.last(), Some(&23));
        assert_eq!(lookups.mins.len(), 60);
        assert_eq!(lookups.statuses, vec!["ON", "OFF"]);
    }
}
