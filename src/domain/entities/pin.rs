//! Controller and pin documents as served by the controller REST API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical level of a pin.
///
/// The controller speaks `"High"` and `"Low"`. Anything else is kept verbatim
/// so one odd pin never breaks decoding of the whole controller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PinValue {
    High,
    #[default]
    Low,
    Other(String),
}

impl PinValue {
    pub fn as_str(&self) -> &str {
        match self {
            Self::High => "High",
            Self::Low => "Low",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_high(&self) -> bool {
        matches!(self, Self::High)
    }
}

impl From<String> for PinValue {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "High" => Self::High,
            "Low" => Self::Low,
            _ => Self::Other(raw),
        }
    }
}

impl From<PinValue> for String {
    fn from(value: PinValue) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for PinValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PinMode {
    Input,
    Output,
    Other(String),
}

impl PinMode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Input => "Input",
            Self::Output => "Output",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for PinMode {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Input" => Self::Input,
            "Output" => Self::Output,
            _ => Self::Other(raw),
        }
    }
}

impl From<PinMode> for String {
    fn from(mode: PinMode) -> Self {
        mode.as_str().to_string()
    }
}

/// A single I/O line of a controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<PinMode>,
    /// Missing values decode as `Low`, i.e. the device shows as off.
    #[serde(default)]
    pub value: PinValue,
}

/// Full controller document returned by `GET /v1/controllers/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Controller {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub pins: Vec<Pin>,
}

/// Pin entry of a write request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinWrite {
    pub id: i64,
    pub mode: PinMode,
    pub value: PinValue,
}

/// Body of `PUT /v1/controllers/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerUpdate {
    pub id: String,
    pub pins: Vec<PinWrite>,
}

impl ControllerUpdate {
    /// Builds a write that touches exactly one output pin.
    pub fn single_pin(controller_id: &str, pin_id: i64, value: PinValue) -> Self {
        Self {
            id: controller_id.to_string(),
            pins: vec![PinWrite {
                id: pin_id,
                mode: PinMode::Output,
                value,
            }],
        }
    }
}
