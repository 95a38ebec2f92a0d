//! Gateway trait for the controller REST API.

use async_trait::async_trait;

use crate::domain::entities::{Controller, ControllerUpdate};
use crate::error::ControllerError;

/// Read and write access to a remote controller.
///
/// `token` is the caller's session credential, sent as-is in the
/// `Authorization` header.
///
/// # Implementations
///
/// - [`crate::infrastructure::controller_client::HttpControllerClient`] - reqwest client
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ControllerGateway: Send + Sync {
    /// Fetches the controller and all of its pins.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Api`] for non-success responses,
    /// [`ControllerError::Transport`] when the host cannot be reached.
    async fn get_controller(
        &self,
        token: &str,
        controller_id: &str,
    ) -> Result<Controller, ControllerError>;

    /// Writes the pins listed in `update` and returns the controller echo.
    ///
    /// # Errors
    ///
    /// Same as [`ControllerGateway::get_controller`].
    async fn update_controller(
        &self,
        token: &str,
        update: &ControllerUpdate,
    ) -> Result<Controller, ControllerError>;
}
