use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::Session;

/// A session behind its own lock. Holding the lock for the length of an action
/// keeps actions on one session strictly sequential.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Idle lifetime used when none is configured.
pub const DEFAULT_IDLE_TTL_SECS: u32 = 60 * 60;

/// In-memory registry of live sessions. Sessions never share state.
///
/// A session untouched for longer than `idle_ttl` is expired: lookups treat it
/// as gone, and `purge_expired` (run on every `create` and by the periodic
/// sweeper) drops it. A session whose lock is held is mid-action and never expires.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::seconds(i64::from(DEFAULT_IDLE_TTL_SECS)))
    }
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            idle_ttl,
        }
    }

    pub async fn create(&self) -> Uuid {
        self.purge_expired().await;

        let session = Session::new();
        let id = session.id;
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        info!("Created session {id}");
        id
    }

    pub async fn get(&self, id: Uuid) -> Result<SessionHandle, AppError> {
        let handle = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))?;

        if self.is_expired(&handle) {
            self.sessions.write().await.remove(&id);
            info!("Session {id} expired after idling");
            return Err(not_found(id));
        }
        Ok(handle)
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                info!("Removed session {id}");
                Ok(())
            }
            None => Err(not_found(id)),
        }
    }

    /// Drops every expired session, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| !self.is_expired(handle));
        let removed = before - sessions.len();
        if removed > 0 {
            info!("Expired {removed} idle session(s)");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn is_expired(&self, handle: &SessionHandle) -> bool {
        match handle.try_lock() {
            Ok(session) => Utc::now() - session.updated_at > self.idle_ttl,
            Err(_) => false,
        }
    }
}

/// Periodically purges idle sessions. Runs until the process exits.
pub async fn run_sweeper(store: SessionStore, every: std::time::Duration) {
    let mut ticker = tokio::time::interval(every);
    loop {
        ticker.tick().await;
        store.purge_expired().await;
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}
