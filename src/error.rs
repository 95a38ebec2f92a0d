//! Error types shared across layers.
//!
//! - [`ControllerError`] - failures talking to the controller REST API
//! - [`AppError`] - errors rendered by the `/api` surface as JSON

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

/// Error code the controller uses for missing or expired credentials.
pub const UNAUTHORIZED_CODE: i64 = 401;

/// Substrings in an error payload that mean the upstream session is gone.
const SESSION_INVALID_MARKERS: [&str; 2] = ["Session", "security check"];

/// Failure of a controller read or write.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The controller answered with a non-success status.
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<i64>,
        message: String,
        payload: Value,
    },

    #[error("controller unreachable: {0}")]
    Transport(String),

    #[error("unexpected controller response: {0}")]
    Decode(String),
}

impl ControllerError {
    /// Builds an [`ControllerError::Api`] from a response status and body.
    ///
    /// The numeric code is read from `code`, falling back to `status`.
    pub fn from_response(status: u16, payload: Value) -> Self {
        let code = payload
            .get("code")
            .and_then(Value::as_i64)
            .or_else(|| payload.get("status").and_then(Value::as_i64));

        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| payload.as_str().filter(|s| !s.is_empty()).map(str::to_string))
            .unwrap_or_else(|| format!("Controller request failed with status {status}"));

        Self::Api {
            status,
            code,
            message,
            payload,
        }
    }

    /// True when the error carries the unauthorized code or HTTP 401.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Api { status, code, .. } => {
                *code == Some(UNAUTHORIZED_CODE) || i64::from(*status) == UNAUTHORIZED_CODE
            }
            _ => false,
        }
    }

    /// True when the serialized error mentions an invalid session.
    pub fn signals_invalid_session(&self) -> bool {
        let serialized = match self {
            Self::Api { payload, .. } => payload.to_string(),
            other => other.to_string(),
        };
        SESSION_INVALID_MARKERS
            .iter()
            .any(|marker| serialized.contains(marker))
    }

    /// Whether this failure must end the user's session.
    pub fn forces_logout(&self) -> bool {
        self.is_unauthorized() || self.signals_invalid_session()
    }

    /// Text shown to the user.
    pub fn alert_message(&self) -> String {
        self.to_string()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    Unauthorized { message: String, details: Value },
    NotFound { message: String, details: Value },
    Upstream { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn upstream(message: impl Into<String>, details: Value) -> Self {
        Self::Upstream {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    fn parts(self) -> (StatusCode, ErrorInfo) {
        let (status, code, message, details) = match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            AppError::Unauthorized { message, details } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", message, details)
            }
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            AppError::Upstream { message, details } => {
                (StatusCode::BAD_GATEWAY, "upstream_error", message, details)
            }
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        };

        (
            status,
            ErrorInfo {
                code,
                message,
                details,
            },
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.parts();
        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Validation failed", details)
    }
}

impl From<ControllerError> for AppError {
    fn from(err: ControllerError) -> Self {
        if err.forces_logout() {
            return AppError::unauthorized(
                "Session expired",
                json!({"reason": err.alert_message()}),
            );
        }

        match err {
            ControllerError::Api {
                status,
                code,
                message,
                ..
            } => AppError::upstream(message, json!({"status": status, "code": code})),
            other => AppError::upstream(other.alert_message(), json!({})),
        }
    }
}
