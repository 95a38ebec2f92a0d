//! Business logic services for the application layer.

pub mod auth_service;
pub mod board_service;
pub mod poller;
pub mod session_registry;

pub use auth_service::AuthService;
pub use board_service::{BoardAccess, BoardService};
pub use poller::PollExit;
pub use session_registry::{SessionContext, SessionRegistry, run_session_janitor};
