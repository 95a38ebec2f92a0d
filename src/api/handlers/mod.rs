//! HTTP request handlers for API endpoints.

pub mod devices;
pub mod health;

pub use devices::{devices_handler, power_handler};
pub use health::health_handler;
