//! # Control Board
//!
//! A web dashboard for switching the GPIO pins of a remote controller on and
//! off, built with Axum and Askama.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Pins, devices, sessions and the per-session board
//! - **Application Layer** ([`application`]) - Sign-in, board orchestration, polling
//! - **Infrastructure Layer** ([`infrastructure`]) - Controller REST client
//! - **API Layer** ([`api`]) - JSON endpoints and shared middleware
//! - **Web Layer** ([`web`]) - Sign-in page and server-rendered control board
//!
//! ## Flow
//!
//! 1. The browser signs in through the identity provider on `/auth`
//! 2. The ID token, name and email are stored in cookies for ten minutes
//! 3. `/controlboard` reads the controller, lists its pins as devices and
//!    starts a poller that refreshes them every ten seconds
//! 4. Pressing a device's button writes the flipped value back
//! 5. An unauthorized or invalid-session answer from the controller logs
//!    the user out
//!
//! ## Quick Start
//!
//! ```bash
//! export CONTROLLER_ID="bfd8dd0a"
//! export IDP_CLIENT_ID="1234.apps.googleusercontent.com"
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;
pub mod web;

pub use error::{AppError, ControllerError};
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users,
/// the `boardctl` binary and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        AuthService, BoardAccess, BoardService, SessionContext, SessionRegistry,
    };
    pub use crate::domain::board::{BoardState, SessionPhase};
    pub use crate::domain::entities::{
        Controller, ControllerUpdate, Device, DeviceMap, Pin, PinValue, Session, device_map,
    };
    pub use crate::domain::gateways::ControllerGateway;
    pub use crate::error::{AppError, ControllerError};
    pub use crate::infrastructure::HttpControllerClient;
    pub use crate::state::AppState;
}
