//! Sign-in and logout flows around the external identity provider.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;
use validator::Validate;

use crate::domain::entities::{Session, SignInCredential};
use crate::error::AppError;

const CONTINUE_PLACEHOLDER: &str = "{continue}";

/// Profile claims the dashboard reads from an ID token.
#[derive(Debug, Default, Deserialize)]
struct IdTokenClaims {
    name: Option<String>,
    email: Option<String>,
}

/// Turns identity-provider callbacks into sessions and builds logout redirects.
///
/// The ID token is not verified here; the controller backend checks it on
/// every request.
pub struct AuthService {
    client_id: String,
    logout_url: String,
    app_base_url: String,
}

impl AuthService {
    /// # Arguments
    ///
    /// - `client_id` - identity-provider client id embedded in the sign-in page
    /// - `logout_url` - external logout endpoint, optionally holding a `{continue}` placeholder
    /// - `app_base_url` - where the logout endpoint sends the browser back to
    pub fn new(
        client_id: impl Into<String>,
        logout_url: impl Into<String>,
        app_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            logout_url: logout_url.into(),
            app_base_url: app_base_url.into(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Builds a [`Session`] from the sign-in callback.
    ///
    /// Profile fields missing from the callback are taken from the ID token's
    /// payload claims when it decodes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty token or malformed email.
    pub fn sign_in(&self, credential: SignInCredential) -> Result<Session, AppError> {
        let credential = SignInCredential {
            id_token: credential.id_token.trim().to_string(),
            name: non_blank(credential.name),
            email: non_blank(credential.email),
        };
        credential.validate()?;

        let claims = if credential.name.is_none() || credential.email.is_none() {
            decode_claims(&credential.id_token).unwrap_or_default()
        } else {
            IdTokenClaims::default()
        };

        let session = Session::new(credential.id_token).with_profile(
            credential.name.or(claims.name),
            credential.email.or(claims.email),
        );

        info!(
            session = %session.fingerprint(),
            user = session.display_name(),
            "user signed in"
        );
        Ok(session)
    }

    /// External logout endpoint that chains back to the app.
    ///
    /// A `{continue}` placeholder in the configured URL is replaced with the
    /// app base URL verbatim; otherwise a `continue` query parameter is added.
    pub fn logout_redirect_url(&self) -> String {
        if self.logout_url.contains(CONTINUE_PLACEHOLDER) {
            return self
                .logout_url
                .replace(CONTINUE_PLACEHOLDER, &self.app_base_url);
        }

        match Url::parse(&self.logout_url) {
            Ok(mut url) => {
                url.query_pairs_mut()
                    .append_pair("continue", &self.app_base_url);
                url.to_string()
            }
            Err(_) => self.app_base_url.clone(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Reads the payload segment of a JWT without checking its signature.
fn decode_claims(id_token: &str) -> Option<IdTokenClaims> {
    let payload = id_token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| debug!("ID token payload is not base64url: {e}"))
        .ok()?;
    serde_json::from_slice(&bytes)
        .map_err(|e| debug!("ID token payload is not JSON: {e}"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service() -> AuthService {
        AuthService::new(
            "client-123",
            "https://www.google.com/accounts/Logout",
            "https://controller.example.com",
        )
    }

    fn jwt(claims: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn test_sign_in_uses_callback_profile() {
        let session = service()
            .sign_in(SignInCredential {
                id_token: "opaque-token".into(),
                name: Some("Ann".into()),
                email: Some("ann@example.com".into()),
            })
            .unwrap();

        assert_eq!(session.token, "opaque-token");
        assert_eq!(session.user.as_deref(), Some("Ann"));
        assert_eq!(session.email.as_deref(), Some("ann@example.com"));
    }

    #[test]
    fn test_sign_in_falls_back_to_token_claims() {
        let token = jwt(json!({"name": "Bob", "email": "bob@example.com", "sub": "1"}));

        let session = service()
            .sign_in(SignInCredential {
                id_token: token.clone(),
                name: None,
                email: Some("  ".into()),
            })
            .unwrap();

        assert_eq!(session.token, token);
        assert_eq!(session.user.as_deref(), Some("Bob"));
        assert_eq!(session.email.as_deref(), Some("bob@example.com"));
    }

    #[test]
    fn test_sign_in_with_opaque_token_and_no_profile() {
        let session = service()
            .sign_in(SignInCredential {
                id_token: "not-a-jwt".into(),
                name: None,
                email: None,
            })
            .unwrap();

        assert!(session.user.is_none());
        assert!(session.email.is_none());
    }

    #[test]
    fn test_sign_in_rejects_blank_token() {
        let result = service().sign_in(SignInCredential {
            id_token: "   ".into(),
            name: None,
            email: None,
        });

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_logout_redirect_fills_placeholder() {
        let service = AuthService::new(
            "client-123",
            "https://www.google.com/accounts/Logout?continue=https://appengine.google.com/_ah/logout?continue={continue}",
            "https://controller.example.com",
        );

        assert_eq!(
            service.logout_redirect_url(),
            "https://www.google.com/accounts/Logout?continue=https://appengine.google.com/_ah/logout?continue=https://controller.example.com"
        );
    }

    #[test]
    fn test_logout_redirect_chains_back_to_app() {
        assert_eq!(
            service().logout_redirect_url(),
            "https://www.google.com/accounts/Logout?continue=https%3A%2F%2Fcontroller.example.com"
        );
    }
}
