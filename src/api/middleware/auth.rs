//! Session authentication for API requests.

use axum::{
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use crate::domain::entities::Session;
use crate::error::AppError;
use crate::web::cookies::session_from_jar;

/// Authenticates API requests and exposes the [`Session`] as an extension.
///
/// # Credentials
///
/// Checked in order:
///
/// 1. The dashboard's `session` cookie (plus `user`/`email` when present)
/// 2. The `Authorization` header, either the raw ID token or `Bearer <token>`
///
/// The token is not checked here; the controller rejects bad tokens and
/// that rejection ends the session like any other unauthorized response.
///
/// # Errors
///
/// Returns `401 Unauthorized` when neither credential is present.
pub async fn layer(mut req: Request, next: Next) -> Result<Response, AppError> {
    let jar = CookieJar::from_headers(req.headers());

    let session = session_from_jar(&jar)
        .or_else(|| {
            req.headers()
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(token_from_header)
                .map(Session::new)
        })
        .ok_or_else(|| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "session cookie or Authorization header is missing"}),
            )
        })?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

fn token_from_header(value: &str) -> Option<String> {
    let value = value.trim();
    let token = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    };
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_header() {
        assert_eq!(token_from_header("raw-token").as_deref(), Some("raw-token"));
        assert_eq!(token_from_header("Bearer abc").as_deref(), Some("abc"));
        assert_eq!(token_from_header("  bearer abc ").as_deref(), Some("abc"));
        assert!(token_from_header("Bearer   ").is_none());
        assert!(token_from_header("").is_none());
    }
}
