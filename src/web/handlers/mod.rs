//! HTML page and form handlers for the browser dashboard.

mod auth;
mod controlboard;

pub use auth::{auth_page_handler, index_handler, logout_handler, sign_in_handler};
pub use controlboard::{controlboard_handler, toggle_power_handler};
