//! Cookie session guard for the control board pages.

use axum::{
    extract::Request,
    middleware::Next,
    response::{Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::web::LOGOUT_PATH;
use crate::web::cookies::session_from_jar;

/// Requires a `session` cookie and exposes it to handlers as an
/// `Extension<Session>`.
///
/// # Errors
///
/// Redirects to `/logout` when the cookie is missing or empty, which clears
/// any leftover `user`/`email` cookies and ends at the sign-in page.
pub async fn layer(mut req: Request, next: Next) -> Result<Response, Redirect> {
    let jar = CookieJar::from_headers(req.headers());

    match session_from_jar(&jar) {
        Some(session) => {
            req.extensions_mut().insert(session);
            Ok(next.run(req).await)
        }
        None => Err(Redirect::to(LOGOUT_PATH)),
    }
}
