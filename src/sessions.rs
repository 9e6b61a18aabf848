//! Session registry — one [`FormStore`] per active wizard session.
//!
//! Sessions are isolated by UUID: each entry owns its (Record, cursor)
//! pair, and operations on a single session run to completion under the
//! registry lock. Nothing is persisted; dropping an entry is the whole
//! cleanup story.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::SessionError;
use crate::wizard::store::FormStore;

struct SessionEntry {
    store: FormStore,
    last_active: DateTime<Utc>,
}

/// In-memory registry of active wizard sessions.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
}

impl SessionRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
        })
    }

    /// Start a new wizard session with a fresh store.
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;
        sessions.insert(
            id,
            SessionEntry {
                store: FormStore::new(),
                last_active: Utc::now(),
            },
        );
        info!(session_id = %id, "Wizard session created");
        id
    }

    /// Run a closure against a session's store, refreshing its idle stamp.
    pub async fn with_mut<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut FormStore) -> T,
    ) -> Result<T, SessionError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(&id)
            .ok_or(SessionError::NotFound { id })?;
        entry.last_active = Utc::now();
        Ok(f(&mut entry.store))
    }

    /// Read-only access to a session's store.
    pub async fn with<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&FormStore) -> T,
    ) -> Result<T, SessionError> {
        let sessions = self.sessions.read().await;
        let entry = sessions.get(&id).ok_or(SessionError::NotFound { id })?;
        Ok(f(&entry.store))
    }

    /// Remove a session, returning its store. Used for both submission
    /// handoff and abandonment.
    pub async fn remove(&self, id: Uuid) -> Result<FormStore, SessionError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.remove(&id).ok_or(SessionError::NotFound { id })?;
        info!(session_id = %id, "Wizard session removed");
        Ok(entry.store)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop sessions idle longer than `max_idle`. Returns how many were
    /// pruned.
    pub async fn prune_idle(&self, max_idle: Duration) -> usize {
        let idle = match chrono::Duration::from_std(max_idle) {
            Ok(d) => d,
            Err(_) => return 0,
        };
        let cutoff = match Utc::now().checked_sub_signed(idle) {
            Some(t) => t,
            None => return 0,
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_active > cutoff);
        let pruned = before - sessions.len();
        if pruned > 0 {
            debug!(pruned, "Pruned idle wizard sessions");
        }
        pruned
    }
}

/// Spawn the periodic idle-session sweep.
pub fn spawn_prune_task(
    registry: Arc<SessionRegistry>,
    interval: Duration,
    max_idle: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            registry.prune_idle(max_idle).await;
        }
    })
}
