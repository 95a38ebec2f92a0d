//! Session cookies: `session`, `user` and `email`.
//!
//! All three share one lifetime and domain. Deleting a cookie sends an
//! expiry in the past.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::{Duration, OffsetDateTime};

use crate::domain::entities::Session;

pub const SESSION_COOKIE: &str = "session";
pub const USER_COOKIE: &str = "user";
pub const EMAIL_COOKIE: &str = "email";

/// Attributes applied to every session cookie.
#[derive(Debug, Clone)]
pub struct CookiePolicy {
    domain: Option<String>,
    ttl: Duration,
    secure: bool,
}

impl CookiePolicy {
    pub fn new(domain: Option<String>, ttl: std::time::Duration, secure: bool) -> Self {
        Self {
            domain,
            ttl: Duration::try_from(ttl).unwrap_or(Duration::minutes(10)),
            secure,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Adds `name=value` expiring one TTL from now.
    pub fn set_cookie(
        &self,
        jar: CookieJar,
        name: &'static str,
        value: impl Into<String>,
    ) -> CookieJar {
        let mut cookie = Cookie::build((name, value.into()))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(self.ttl)
            .expires(OffsetDateTime::now_utc() + self.ttl);

        if let Some(domain) = &self.domain {
            cookie = cookie.domain(domain.clone());
        }

        jar.add(cookie)
    }

    /// Removes `name`, emitting an already-expired cookie.
    pub fn delete_cookie(&self, jar: CookieJar, name: &'static str) -> CookieJar {
        let mut removal = Cookie::build(name).path("/");
        if let Some(domain) = &self.domain {
            removal = removal.domain(domain.clone());
        }
        jar.remove(removal)
    }

    pub fn store_session(&self, jar: CookieJar, session: &Session) -> CookieJar {
        let mut jar = self.set_cookie(jar, SESSION_COOKIE, session.token.clone());
        if let Some(user) = &session.user {
            jar = self.set_cookie(jar, USER_COOKIE, user.clone());
        }
        if let Some(email) = &session.email {
            jar = self.set_cookie(jar, EMAIL_COOKIE, email.clone());
        }
        jar
    }

    pub fn clear_session(&self, jar: CookieJar) -> CookieJar {
        [SESSION_COOKIE, USER_COOKIE, EMAIL_COOKIE]
            .into_iter()
            .fold(jar, |jar, name| self.delete_cookie(jar, name))
    }
}

/// Reads a cookie value by name; empty values count as absent.
pub fn get_cookie(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// Rebuilds the session from its cookies, if the `session` cookie is present.
pub fn session_from_jar(jar: &CookieJar) -> Option<Session> {
    let token = get_cookie(jar, SESSION_COOKIE)?;
    Some(Session::new(token).with_profile(
        get_cookie(jar, USER_COOKIE),
        get_cookie(jar, EMAIL_COOKIE),
    ))
}
