//! Sign-in page, identity-provider callback and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};

use crate::domain::entities::SignInCredential;
use crate::state::AppState;
use crate::web::cookies::{SESSION_COOKIE, get_cookie};
use crate::web::{AUTH_CALLBACK_PATH, AUTH_PATH, CONTROL_BOARD_PATH};

/// Renders `templates/auth.html`: the identity-provider widget, which posts
/// the ID token and profile to the callback.
#[derive(Template, WebTemplate)]
#[template(path = "auth.html")]
struct AuthTemplate {
    client_id: String,
    callback_path: &'static str,
}

/// `GET /` sends the browser to the sign-in page.
pub async fn index_handler() -> Redirect {
    Redirect::to(AUTH_PATH)
}

/// Renders the sign-in page.
///
/// # Endpoint
///
/// `GET /auth`
pub async fn auth_page_handler(State(state): State<AppState>) -> impl IntoResponse {
    AuthTemplate {
        client_id: state.auth_service.client_id().to_string(),
        callback_path: AUTH_CALLBACK_PATH,
    }
}

/// Stores the signed-in session in cookies and opens the control board.
///
/// # Endpoint
///
/// `POST /auth/callback` with form fields `id_token`, `name`, `email`
///
/// A rejected callback sends the browser back to the sign-in page.
pub async fn sign_in_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(credential): Form<SignInCredential>,
) -> Response {
    match state.auth_service.sign_in(credential) {
        Ok(session) => {
            let jar = state.cookies.store_session(jar, &session);
            (jar, Redirect::to(CONTROL_BOARD_PATH)).into_response()
        }
        Err(err) => {
            warn!(error = ?err, "sign-in callback rejected");
            Redirect::to(AUTH_PATH).into_response()
        }
    }
}

/// Ends the session: stops its poller, deletes the cookies and hands the
/// browser to the external logout endpoint.
///
/// # Endpoint
///
/// `GET /logout`
pub async fn logout_handler(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(token) = get_cookie(&jar, SESSION_COOKIE)
        && let Some(ctx) = state.sessions.remove(&token).await
    {
        info!(session = %ctx.session().fingerprint(), "user logged out");
    }

    let jar = state.cookies.clear_session(jar);
    let target = state.auth_service.logout_redirect_url();
    (jar, Redirect::to(&target))
}
