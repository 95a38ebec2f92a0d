use std::sync::Arc;

use crate::application::services::{AuthService, BoardService, SessionRegistry};
use crate::web::cookies::CookiePolicy;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub board_service: Arc<BoardService>,
    pub sessions: Arc<SessionRegistry>,
    pub cookies: Arc<CookiePolicy>,
}
