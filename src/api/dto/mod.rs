//! Response bodies for the JSON API.

pub mod board;
pub mod health;
