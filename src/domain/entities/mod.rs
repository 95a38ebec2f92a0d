//! Core domain entities representing the controller data model.
//!
//! Entities mirror the JSON documents exchanged with the controller REST API
//! plus the view projections the dashboard renders from them.
//!
//! # Entity Types
//!
//! - [`Controller`] - A remote hardware endpoint and its pins
//! - [`Pin`] - A single controllable I/O line
//! - [`Device`] - The dashboard's display projection of a pin
//! - [`Session`] - The short-lived credential of a signed-in user
//!
//! # Design Pattern
//!
//! Read models and write payloads are separate structs:
//! - `Controller`, `Pin` - What the controller returns
//! - `ControllerUpdate`, `PinWrite` - What a toggle sends back

pub mod device;
pub mod pin;
pub mod session;

pub use device::{Device, DeviceMap, POWER_OFF_CSS_CLASS, POWER_ON_CSS_CLASS, device_map};
pub use pin::{Controller, ControllerUpdate, Pin, PinMode, PinValue, PinWrite};
pub use session::{Session, SignInCredential};
