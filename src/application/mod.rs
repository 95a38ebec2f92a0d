//! Application layer services implementing the dashboard's behaviour.
//!
//! Services consume the gateway trait and the board state, and provide a
//! clean API for HTTP handlers and the CLI.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Sign-in callback and logout redirect
//! - [`services::board_service::BoardService`] - Controller reads, polling and toggles
//! - [`services::session_registry::SessionRegistry`] - Live session contexts
//! - [`services::poller`] - Cancellable per-session poll loop

pub mod services;
