//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Required Variables
//!
//! - `CONTROLLER_ID` - Identifier of the controller the board shows
//!
//! ## Optional Variables
//!
//! - `BACKEND_URL` - Controller REST API host (default: `https://controller.bytescheme.com`)
//! - `APP_BASE_URL` - Public URL of this dashboard (default: `BACKEND_URL`)
//! - `COOKIE_DOMAIN` - Domain the session cookies are scoped to (default: host of `APP_BASE_URL`)
//! - `SESSION_TTL_SECONDS` - Cookie and session lifetime (default: 600)
//! - `POLL_INTERVAL_SECONDS` - Delay between board refreshes (default: 10)
//! - `REQUEST_TIMEOUT_SECONDS` - Timeout for controller requests (default: 15)
//! - `LOGOUT_URL` - External logout endpoint; `{continue}` is replaced with `APP_BASE_URL`
//! - `IDP_CLIENT_ID` - Identity provider client id for the sign-in widget
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "https://controller.bytescheme.com";
pub const DEFAULT_LOGOUT_URL: &str = "https://www.google.com/accounts/Logout?continue=https://appengine.google.com/_ah/logout?continue={continue}";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    pub backend_url: String,
    pub app_base_url: String,
    pub controller_id: String,
    /// `None` leaves the cookie host-only.
    pub cookie_domain: Option<String>,
    pub session_ttl_seconds: u64,
    pub poll_interval_seconds: u64,
    pub request_timeout_seconds: u64,
    pub logout_url: String,
    pub idp_client_id: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `CONTROLLER_ID` is missing.
    pub fn from_env() -> Result<Self> {
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let backend_url = env::var("BACKEND_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        let app_base_url = env::var("APP_BASE_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| backend_url.clone());

        let controller_id = env::var("CONTROLLER_ID").context("CONTROLLER_ID must be set")?;

        let cookie_domain = env::var("COOKIE_DOMAIN")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| host_of(&app_base_url));

        let session_ttl_seconds = parse_or("SESSION_TTL_SECONDS", 600);
        let poll_interval_seconds = parse_or("POLL_INTERVAL_SECONDS", 10);
        let request_timeout_seconds = parse_or("REQUEST_TIMEOUT_SECONDS", 15);

        let logout_url = env::var("LOGOUT_URL").unwrap_or_else(|_| DEFAULT_LOGOUT_URL.to_string());
        let idp_client_id = env::var("IDP_CLIENT_ID").unwrap_or_default();

        Ok(Self {
            listen_addr,
            log_level,
            log_format,
            backend_url,
            app_base_url,
            controller_id,
            cookie_domain,
            session_ttl_seconds,
            poll_interval_seconds,
            request_timeout_seconds,
            logout_url,
            idp_client_id,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - `backend_url` or `app_base_url` is not an http(s) URL
    /// - `controller_id` is blank
    /// - any interval or TTL is zero
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        validate_http_url("BACKEND_URL", &self.backend_url)?;
        validate_http_url("APP_BASE_URL", &self.app_base_url)?;

        if self.controller_id.trim().is_empty() {
            anyhow::bail!("CONTROLLER_ID must not be empty");
        }

        if self.session_ttl_seconds == 0 {
            anyhow::bail!("SESSION_TTL_SECONDS must be greater than 0");
        }

        if self.poll_interval_seconds == 0 {
            anyhow::bail!("POLL_INTERVAL_SECONDS must be greater than 0");
        }

        if self.request_timeout_seconds == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECONDS must be greater than 0");
        }

        Ok(())
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_seconds)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Backend: {}", self.backend_url);
        tracing::info!("  App base URL: {}", self.app_base_url);
        tracing::info!("  Controller: {}", self.controller_id);
        tracing::info!(
            "  Cookie domain: {}",
            self.cookie_domain.as_deref().unwrap_or("(host-only)")
        );
        tracing::info!("  Session TTL: {}s", self.session_ttl_seconds);
        tracing::info!("  Poll interval: {}s", self.poll_interval_seconds);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

fn parse_or(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

fn validate_http_url(key: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).with_context(|| format!("{key} is not a valid URL: '{value}'"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("{key} must start with 'http://' or 'https://', got '{value}'");
    }
    Ok(())
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
