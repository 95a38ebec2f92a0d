//! Session entity carried in the `session`, `user` and `email` cookies.

use serde::Deserialize;
use sha2::{Digest, Sha256};
use validator::Validate;

/// Credential handed over by the identity provider's sign-in widget.
///
/// `name` and `email` come from the widget's basic profile. When the widget
/// does not supply them they are read from the ID token claims instead.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInCredential {
    #[validate(length(min = 1, message = "id_token must not be empty"))]
    pub id_token: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
}

/// A signed-in user.
///
/// The token is forwarded verbatim as the `Authorization` header of every
/// controller request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: Option<String>,
    pub email: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user: None,
            email: None,
        }
    }

    pub fn with_profile(mut self, user: Option<String>, email: Option<String>) -> Self {
        self.user = user;
        self.email = email;
        self
    }

    /// Short SHA-256 digest of the token, safe to write to logs.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.token.as_bytes());
        hex::encode(&digest[..6])
    }

    pub fn display_name(&self) -> &str {
        self.user
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("signed-in user")
    }
}
