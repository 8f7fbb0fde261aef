//! Per-caller session storage

use backchodi_core::{BattleError, CallerId, GameSession, Result, SessionId, SessionStatus};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Shared handle to one session; held for the whole of a mutating operation
pub type SessionHandle = Arc<Mutex<GameSession>>;

/// One caller's sessions, in creation order
#[derive(Debug, Default)]
pub struct SessionBucket {
    order: Vec<SessionId>,
    sessions: HashMap<SessionId, SessionHandle>,
}

impl SessionBucket {
    /// Look up a session
    pub fn get(&self, session_id: &str) -> Option<SessionHandle> {
        self.sessions.get(session_id).cloned()
    }

    /// Add a session and return its handle
    pub fn insert(&mut self, session: GameSession) -> SessionHandle {
        let session_id = session.session_id.clone();
        let handle = Arc::new(Mutex::new(session));
        if self
            .sessions
            .insert(session_id.clone(), handle.clone())
            .is_none()
        {
            self.order.push(session_id);
        }
        handle
    }

    /// Session handles in creation order
    pub fn handles(&self) -> impl Iterator<Item = &SessionHandle> {
        self.order.iter().filter_map(|id| self.sessions.get(id))
    }

    /// Id of the first waiting or active session, if any
    pub async fn in_flight(&self) -> Option<SessionId> {
        for handle in self.handles() {
            let session = handle.lock().await;
            if session.is_in_flight() {
                return Some(session.session_id.clone());
            }
        }
        None
    }
}

/// All sessions, keyed by caller
///
/// Lives for the whole process. Nothing is ever evicted.
#[derive(Default)]
pub struct SessionStore {
    buckets: RwLock<HashMap<CallerId, Arc<Mutex<SessionBucket>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the caller's bucket, creating it on first use
    pub async fn get_or_create_bucket(&self, caller_id: &str) -> Result<Arc<Mutex<SessionBucket>>> {
        if caller_id.is_empty() {
            return Err(BattleError::InvalidArgument(
                "puch_user_id is required".into(),
            ));
        }

        if let Some(bucket) = self.buckets.read().await.get(caller_id) {
            return Ok(bucket.clone());
        }

        let mut buckets = self.buckets.write().await;
        Ok(buckets.entry(caller_id.to_string()).or_default().clone())
    }

    /// Look up one of the caller's sessions
    pub async fn get(&self, caller_id: &str, session_id: &str) -> Result<Option<SessionHandle>> {
        let bucket = self.get_or_create_bucket(caller_id).await?;
        let bucket = bucket.lock().await;
        Ok(bucket.get(session_id))
    }

    /// Snapshot the caller's sessions that satisfy `predicate`, in creation
    /// order
    pub async fn list<F>(&self, caller_id: &str, predicate: F) -> Result<Vec<SessionStatus>>
    where
        F: Fn(&GameSession) -> bool,
    {
        let bucket = self.get_or_create_bucket(caller_id).await?;
        let bucket = bucket.lock().await;

        let mut matches = Vec::new();
        for handle in bucket.handles() {
            let session = handle.lock().await;
            if predicate(&session) {
                matches.push(session.status());
            }
        }
        Ok(matches)
    }

    /// Number of callers seen so far
    #[cfg(test)]
    async fn caller_count(&self) -> usize {
        self.buckets.read().await.len()
    }
}
