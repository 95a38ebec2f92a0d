//! Device view model derived from controller pins.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::pin::{Controller, Pin, PinValue};

pub const POWER_ON_CSS_CLASS: &str = "power_on";
pub const POWER_OFF_CSS_CLASS: &str = "power_off";

/// Display projection of a [`Pin`].
///
/// Rebuilt from every controller response; never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    #[serde(rename = "deviceId")]
    pub device_id: i64,
    pub name: String,
    #[serde(rename = "powerOn")]
    pub power_on: bool,
    pub button_css_class: String,
}

impl Device {
    pub fn from_pin(pin: &Pin) -> Self {
        let power_on = pin.value.is_high();
        let css_class = if power_on {
            POWER_ON_CSS_CLASS
        } else {
            POWER_OFF_CSS_CLASS
        };

        Self {
            device_id: pin.id,
            name: pin.name.clone(),
            power_on,
            button_css_class: css_class.to_string(),
        }
    }

    /// Value that flips the device: on goes `Low`, off goes `High`.
    pub fn toggled_value(&self) -> PinValue {
        if self.power_on {
            PinValue::Low
        } else {
            PinValue::High
        }
    }

    pub fn key(&self) -> String {
        self.device_id.to_string()
    }
}

/// Devices keyed by the stringified pin id.
pub type DeviceMap = BTreeMap<String, Device>;

/// Derives one device per pin of `controller`.
pub fn device_map(controller: &Controller) -> DeviceMap {
    controller
        .pins
        .iter()
        .map(Device::from_pin)
        .map(|device| (device.key(), device))
        .collect()
}
