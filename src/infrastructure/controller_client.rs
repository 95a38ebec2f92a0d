//! HTTP implementation of [`ControllerGateway`] backed by `reqwest`.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::domain::entities::{Controller, ControllerUpdate};
use crate::domain::gateways::ControllerGateway;
use crate::error::ControllerError;

/// Client for `/v1/controllers/{id}` on the controller backend.
///
/// The session token goes into `Authorization` without a scheme prefix,
/// which is what the backend expects.
#[derive(Clone)]
pub struct HttpControllerClient {
    client: Client,
    base_url: Url,
}

impl HttpControllerClient {
    /// Builds a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Transport`] if the URL does not parse or the
    /// TLS backend cannot be initialised.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ControllerError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ControllerError::Transport(format!("invalid backend URL: {e}")))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ControllerError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    fn resource_url(&self, controller_id: &str) -> Result<Url, ControllerError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ControllerError::Transport("backend URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(["v1", "controllers", controller_id]);
        Ok(url)
    }

    async fn decode(response: Response) -> Result<Controller, ControllerError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json::<Controller>()
                .await
                .map_err(|e| ControllerError::Decode(e.to_string()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ControllerError::Transport(e.to_string()))?;
        let payload = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));

        warn!(status = status.as_u16(), "controller returned an error");
        Err(ControllerError::from_response(status.as_u16(), payload))
    }
}

#[async_trait]
impl ControllerGateway for HttpControllerClient {
    async fn get_controller(
        &self,
        token: &str,
        controller_id: &str,
    ) -> Result<Controller, ControllerError> {
        let url = self.resource_url(controller_id)?;
        debug!(%url, "GET controller");

        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, token)
            .send()
            .await
            .map_err(|e| ControllerError::Transport(e.to_string()))?;

        Self::decode(response).await
    }

    async fn update_controller(
        &self,
        token: &str,
        update: &ControllerUpdate,
    ) -> Result<Controller, ControllerError> {
        let url = self.resource_url(&update.id)?;
        debug!(%url, pins = update.pins.len(), "PUT controller");

        let response = self
            .client
            .put(url)
            .header(AUTHORIZATION, token)
            .json(update)
            .send()
            .await
            .map_err(|e| ControllerError::Transport(e.to_string()))?;

        Self::decode(response).await
    }
}
