//! Bearer-token session table.
//!
//! Each successful `POST /api/login` gets its own [`Session`] keyed by a
//! random token. Entries expire after `ttl` without use; every lookup
//! pushes the deadline forward.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use niaga_executor::Session;
use tracing::debug;
use uuid::Uuid;

struct Entry {
    session: Arc<Session>,
    expires_at: Instant,
}

/// Live login sessions
pub struct SessionStore {
    entries: DashMap<Uuid, Entry>,
    ttl: Duration,
}

impl SessionStore {
    /// Empty store whose sessions live `ttl` past their last use
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Register a logged-in session and return its token
    pub fn insert(&self, session: Arc<Session>) -> Uuid {
        let token = Uuid::new_v4();
        self.entries.insert(
            token,
            Entry {
                session,
                expires_at: Instant::now() + self.ttl,
            },
        );
        token
    }

    /// The session behind `token`, refreshing its deadline
    pub fn get(&self, token: &Uuid) -> Option<Arc<Session>> {
        let now = Instant::now();
        let mut entry = self.entries.get_mut(token)?;
        if entry.expires_at <= now {
            drop(entry);
            self.entries.remove(token);
            return None;
        }
        entry.expires_at = now + self.ttl;
        Some(entry.session.clone())
    }

    /// Forget a token; returns whether it existed
    pub fn remove(&self, token: &Uuid) -> bool {
        self.entries.remove(token).is_some()
    }

    /// Drop expired entries, returning how many went
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        let purged = before.saturating_sub(self.entries.len());
        if purged > 0 {
            debug!(purged, "expired sessions removed");
        }
        purged
    }

    /// Live entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no session is live
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Idle lifetime of a session
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use niaga_engine::Database;
    use niaga_executor::Executor;

    fn session() -> Arc<Session> {
        let executor = Executor::new(Arc::new(Database::ephemeral()));
        Arc::new(Session::new(Arc::new(executor)))
    }

    #[test]
    fn test_insert_get_remove() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.insert(session());
        assert!(store.get(&token).is_some());
        assert!(store.get(&Uuid::new_v4()).is_none());
        assert!(store.remove(&token));
        assert!(!store.remove(&token));
        assert!(store.is_empty());
    }

    #[test]
    fn test_zero_ttl_expires() {
        let store = SessionStore::new(Duration::ZERO);
        let token = store.insert(session());
        assert!(store.get(&token).is_none());
        assert!(store.is_empty());

        store.insert(session());
        store.insert(session());
        assert_eq!(store.purge_expired(), 2);
    }
}
