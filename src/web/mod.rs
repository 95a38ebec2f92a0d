//! Browser dashboard layer.
//!
//! Serves the sign-in page and the server-rendered control board. Pages are
//! rendered with Askama templates; session state travels in cookies.
//!
//! # Modules
//!
//! - [`cookies`] - Session cookie policy and readers
//! - [`handlers`] - Page and form handlers
//! - [`middleware`] - Cookie session guard
//! - [`routes`] - Dashboard route configuration

pub mod cookies;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub const AUTH_PATH: &str = "/auth";
pub const AUTH_CALLBACK_PATH: &str = "/auth/callback";
pub const LOGOUT_PATH: &str = "/logout";
pub const CONTROL_BOARD_PATH: &str = "/controlboard";
