//! Gateway trait definitions for external services.
//!
//! Traits define the contract; implementations live in
//! `crate::infrastructure`. Mock implementations are generated via `mockall`
//! for unit tests.

pub mod controller_gateway;

pub use controller_gateway::ControllerGateway;

#[cfg(test)]
pub use controller_gateway::MockControllerGateway;
