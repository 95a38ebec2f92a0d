//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`controller_client`] - reqwest client for the controller REST API

pub mod controller_client;

pub use controller_client::HttpControllerClient;
