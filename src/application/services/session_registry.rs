//! Live session contexts, one per signed-in token.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::board::{BoardState, SessionPhase};
use crate::domain::entities::{Device, Session};

/// Everything the server holds for one signed-in session.
///
/// Created on the first board request after sign-in and dropped at logout,
/// forced logout or expiry. Cancelling [`SessionContext::stop`] ends the
/// session's poller.
pub struct SessionContext {
    session: Session,
    board: RwLock<BoardState>,
    cancel: CancellationToken,
    init_guard: Mutex<()>,
    expires_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(session: Session, ttl: ChronoDuration) -> Self {
        Self {
            session,
            board: RwLock::new(BoardState::new()),
            cancel: CancellationToken::new(),
            init_guard: Mutex::new(()),
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn board(&self) -> &RwLock<BoardState> {
        &self.board
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Serialises board initialisation for concurrent first requests.
    pub(crate) fn init_guard(&self) -> &Mutex<()> {
        &self.init_guard
    }

    pub async fn phase(&self) -> SessionPhase {
        self.board.read().await.phase()
    }

    pub async fn device(&self, device_id: i64) -> Option<Device> {
        self.board.read().await.device(device_id).cloned()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Stops polling for this session.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

/// Registry of [`SessionContext`]s keyed by session token.
pub struct SessionRegistry {
    entries: RwLock<HashMap<String, Arc<SessionContext>>>,
    ttl: ChronoDuration,
}

impl SessionRegistry {
    /// `ttl` matches the cookie lifetime; contexts older than that are pruned.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: ChronoDuration::from_std(ttl).unwrap_or(ChronoDuration::days(1)),
        }
    }

    /// Returns the context for `session.token`, creating it on first use.
    pub async fn get_or_insert(&self, session: Session) -> Arc<SessionContext> {
        if let Some(existing) = self.get(&session.token).await {
            return existing;
        }

        let mut entries = self.entries.write().await;
        entries
            .entry(session.token.clone())
            .or_insert_with(|| {
                debug!(session = %session.fingerprint(), "session context created");
                Arc::new(SessionContext::new(session, self.ttl))
            })
            .clone()
    }

    pub async fn get(&self, token: &str) -> Option<Arc<SessionContext>> {
        self.entries.read().await.get(token).cloned()
    }

    /// Removes the context and stops its poller.
    pub async fn remove(&self, token: &str) -> Option<Arc<SessionContext>> {
        let removed = self.entries.write().await.remove(token);
        if let Some(ctx) = &removed {
            ctx.stop();
            debug!(session = %ctx.session().fingerprint(), "session context removed");
        }
        removed
    }

    /// Drops every context whose lifetime ended before `now`.
    pub async fn prune_expired(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, ctx| {
            let keep = !ctx.is_expired(now);
            if !keep {
                ctx.stop();
            }
            keep
        });
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Stops every poller and empties the registry.
    pub async fn shutdown(&self) {
        let mut entries = self.entries.write().await;
        for ctx in entries.values() {
            ctx.stop();
        }
        let count = entries.len();
        entries.clear();
        info!(count, "stopped all session pollers");
    }
}

/// Periodically prunes expired sessions until `cancel` fires.
pub async fn run_session_janitor(
    registry: Arc<SessionRegistry>,
    every: Duration,
    cancel: CancellationToken,
) {
    info!("session janitor started (interval={every:?})");
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("session janitor stopped");
                break;
            }
            _ = tokio::time::sleep(every) => {
                match registry.prune_expired(Utc::now()).await {
                    0 => {}
                    n => info!("session janitor: pruned {n} expired sessions"),
                }
            }
        }
    }
}
