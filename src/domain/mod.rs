//! Domain layer containing entities, board state and gateway contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Controller, pin, device and session data structures
//! - [`board`] - Per-session board state and its update functions
//! - [`gateways`] - Controller API trait implemented by infrastructure
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Gateway traits define contracts implemented by the infrastructure layer
//! - Orchestration lives in services (see [`crate::application::services`])

pub mod board;
pub mod entities;
pub mod gateways;
