#![allow(dead_code)]

use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use controlboard::application::services::{AuthService, BoardService, SessionRegistry};
use controlboard::infrastructure::HttpControllerClient;
use controlboard::routes::router;
use controlboard::state::AppState;
use controlboard::web::cookies::CookiePolicy;

pub const CONTROLLER_ID: &str = "c1";
pub const TOKEN: &str = "tok-123";
pub const CONTROLLER_PATH: &str = "/v1/controllers/c1";
pub const LOGOUT_URL: &str = "https://idp.example.com/logout?continue={continue}";
pub const APP_BASE_URL: &str = "https://board.example.com";

/// Cookie header of a signed-in browser.
pub fn session_cookies() -> String {
    format!("session={TOKEN}; user=Ann; email=ann@example.com")
}

/// Controller document with a single lamp on pin 5.
pub fn lamp_controller(value: &str) -> Value {
    json!({
        "id": CONTROLLER_ID,
        "name": "Living room",
        "pins": [
            {"id": 5, "name": "Lamp", "mode": "Output", "value": value}
        ]
    })
}

/// Answers authorized reads of the test controller with `body`.
pub async fn mount_controller(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path(CONTROLLER_PATH))
        .and(header("Authorization", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Rejects every read of the test controller with `status` and `body`.
pub async fn mount_controller_error(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(CONTROLLER_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// State wired to a controller at `backend_url`.
///
/// The poll interval is long enough that pollers never tick during a test.
pub fn create_test_state(backend_url: &str) -> AppState {
    let gateway = HttpControllerClient::new(backend_url, Duration::from_secs(5)).unwrap();

    AppState {
        auth_service: Arc::new(AuthService::new("client-123", LOGOUT_URL, APP_BASE_URL)),
        board_service: Arc::new(BoardService::new(
            Arc::new(gateway),
            CONTROLLER_ID,
            Duration::from_secs(3600),
        )),
        sessions: Arc::new(SessionRegistry::new(Duration::from_secs(600))),
        cookies: Arc::new(CookiePolicy::new(None, Duration::from_secs(600), false)),
    }
}

pub fn make_server(state: AppState) -> TestServer {
    TestServer::new(router(state, false)).unwrap()
}

/// All `Set-Cookie` headers of a response.
pub fn set_cookies(response: &axum_test::TestResponse) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

pub fn location(response: &axum_test::TestResponse) -> String {
    response
        .headers()
        .get("location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}
