//! In-memory registry of live import sessions.
//!
//! Construct one store at startup and share it (e.g. behind an `Arc`) with
//! whatever serves requests. Identifiers are issued sequentially as
//! `import-<n>` and are never reused within a process.

use crate::models::session::ImportSession;
use crate::{Error, Result};
use chrono::{Duration, Utc};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

const ID_PREFIX: &str = "import-";

#[derive(Debug, Default)]
struct Inner {
    last_id: u64,
    sessions: BTreeMap<u64, ImportSession>,
}

/// Concurrency-safe session registry.
///
/// Callers must not apply two step transitions to the same session at once;
/// [`SessionStore::update`] serializes them, but two operators racing on one
/// identifier will still see last-writer-wins.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: RwLock<Inner>,
}

/// Only the exact form produced by `format_id` is accepted, so `import-01`
/// and `import-+1` do not alias `import-1`.
fn parse_id(id: &str) -> Option<u64> {
    let n: u64 = id.strip_prefix(ID_PREFIX)?.parse().ok()?;
    (format_id(n) == id).then_some(n)
}

fn format_id(n: u64) -> String {
    format!("{}{}", ID_PREFIX, n)
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a session and return its new identifier.
    pub fn create(&self, session: ImportSession) -> String {
        let mut inner = self.write();
        inner.last_id += 1;
        let n = inner.last_id;
        inner.sessions.insert(n, session);
        tracing::debug!("Created import session {}", format_id(n));
        format_id(n)
    }

    /// Snapshot of a session.
    pub fn get(&self, id: &str) -> Option<ImportSession> {
        let n = parse_id(id)?;
        self.read().sessions.get(&n).cloned()
    }

    /// Apply a step transition to a session under the store lock.
    pub fn update<F, T>(&self, id: &str, apply: F) -> Result<T>
    where
        F: FnOnce(&mut ImportSession) -> Result<T>,
    {
        let mut inner = self.write();
        let session = parse_id(id)
            .and_then(|n| inner.sessions.get_mut(&n))
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
        apply(session)
    }

    /// Remove a session, returning it if it existed.
    pub fn delete(&self, id: &str) -> Option<ImportSession> {
        let n = parse_id(id)?;
        self.write().sessions.remove(&n)
    }

    /// Identifiers of live sessions, oldest first.
    pub fn list(&self) -> Vec<String> {
        self.read().sessions.keys().copied().map(format_id).collect()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.read().sessions.len()
    }

    /// Whether there are no live sessions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop sessions created more than `max_age` ago. Returns how many were removed.
    pub fn prune_older_than(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let mut inner = self.write();
        let before = inner.sessions.len();
        inner.sessions.retain(|_, s| s.created_at >= cutoff);
        let removed = before - inner.sessions.len();
        if removed > 0 {
            tracing::info!("Pruned {} abandoned import sessions", removed);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::SourceDirectory;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn session(name: &str) -> ImportSession {
        ImportSession::new(
            SourceDirectory {
                name: name.to_string(),
                path: PathBuf::from("/inbox").join(name),
                size: 0,
            },
            None,
        )
    }

    #[test]
    fn test_create_get_delete() {
        let store = SessionStore::new();
        let id = store.create(session("A"));
        assert_eq!(id, "import-1");
        assert_eq!(store.get(&id).unwrap().source.name, "A");

        assert!(store.delete(&id).is_some());
        assert!(store.get(&id).is_none());
        assert!(store.delete(&id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_ids_are_not_reused() {
        let store = SessionStore::new();
        let first = store.create(session("A"));
        store.delete(&first);
        let second = store.create(session("B"));
        assert_eq!(second, "import-2");
        assert_eq!(store.list(), vec!["import-2".to_string()]);
    }

    #[test]
    fn test_unknown_ids() {
        let store = SessionStore::new();
        store.create(session("A"));
        assert!(store.get("import-9").is_none());
        assert!(store.get("bogus").is_none());
        assert!(store.get("import-01").is_none());
        assert!(store.get("import-+1").is_none());
        assert!(store.delete("import-01").is_none());
        assert!(store.get("import-1").is_some());
        assert!(matches!(
            store.update("bogus", |_| Ok(())),
            Err(Error::SessionNotFound(_))
        ));
    }

    #[test]
    fn test_update_mutates_in_place() {
        let store = SessionStore::new();
        let id = store.create(session("A"));
        store
            .update(&id, |s| {
                s.title = "Changed".to_string();
                Ok(())
            })
            .unwrap();
        assert_eq!(store.get(&id).unwrap().title, "Changed");
    }

    #[test]
    fn test_concurrent_creates_issue_unique_ids() {
        let store = Arc::new(SessionStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    (0..50)
                        .map(|i| store.create(session(&format!("{}-{}", t, i))))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .map(|id| parse_id(&id).unwrap())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 400);
        assert_eq!(ids.first(), Some(&1));
        assert_eq!(ids.last(), Some(&400));
        assert_eq!(store.len(), 400);
    }

    #[test]
    fn test_prune_older_than() {
        let store = SessionStore::new();
        let mut old = session("old");
        old.created_at = Utc::now() - Duration::hours(48);
        store.create(old);
        let fresh = store.create(session("fresh"));

        assert_eq!(store.prune_older_than(Duration::hours(24)), 1);
        assert_eq!(store.list(), vec![fresh]);
    }
}
