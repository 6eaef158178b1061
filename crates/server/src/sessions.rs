//! In-memory registry of workflow sessions.
//!
//! Sessions idle for longer than the configured limit are evicted whenever a
//! new one is created, so abandoned browser tabs do not accumulate.

use promptplus::Workflow;
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

pub type SharedWorkflow = Arc<Mutex<Workflow>>;

/// Idle limit used when none is configured.
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

struct Session {
    workflow: SharedWorkflow,
    last_seen: Instant,
}

/// Sessions keyed by id. Each session owns exactly one workflow.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
    idle_limit: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_IDLE)
    }
}

impl SessionStore {
    pub fn new(idle_limit: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            idle_limit,
        }
    }

    pub async fn create(&self) -> (Uuid, SharedWorkflow) {
        let now = Instant::now();
        self.evict_idle(now).await;

        let id = Uuid::new_v4();
        let workflow = Arc::new(Mutex::new(Workflow::new()));
        self.inner.write().await.insert(
            id,
            Session {
                workflow: workflow.clone(),
                last_seen: now,
            },
        );
        (id, workflow)
    }

    /// Looks a session up and marks it as active. An expired session counts as
    /// missing even if no sweep has removed it yet.
    pub async fn get(&self, id: &Uuid) -> Option<SharedWorkflow> {
        let now = Instant::now();
        let mut sessions = self.inner.write().await;
        let expired = now.duration_since(sessions.get(id)?.last_seen) > self.idle_limit;
        if expired {
            sessions.remove(id);
            return None;
        }
        let session = sessions.get_mut(id)?;
        session.last_seen = now;
        Some(session.workflow.clone())
    }

    pub async fn remove(&self, id: &Uuid) -> bool {
        self.inner.write().await.remove(id).is_some()
    }

    /// Drops every session not touched within the idle limit as of `now`.
    /// Returns how many were removed.
    pub async fn evict_idle(&self, now: Instant) -> usize {
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| now.duration_since(session.last_seen) <= self.idle_limit);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
        evicted
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
