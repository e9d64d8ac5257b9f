//! The named cache store abstraction and the in-memory implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use log::debug;

use crate::error::Result;
use crate::snapshot::{RequestKey, ResponseSnapshot};

/// Abstraction over the named cache store.
///
/// A store maps request keys to response snapshots under a single name.
/// It is injected into the worker rather than reached as a global, so
/// tests substitute [`MemoryStore`] for the disk-backed default.
///
/// There is no delete and no eviction: entries live until the hosting
/// environment removes the store.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// The cache name this store was opened with.
    fn name(&self) -> &str;

    /// Looks up a stored snapshot for `key`. Exact match only.
    async fn get(&self, key: &RequestKey) -> Result<Option<ResponseSnapshot>>;

    /// Stores `snapshot` under `key`, replacing any existing entry.
    async fn put(&self, key: &RequestKey, snapshot: ResponseSnapshot) -> Result<()>;
}

/// In-memory cache store.
///
/// Lives only as long as the process; useful for tests and for hosts that
/// do not want anything persisted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    name: String,
    entries: Mutex<HashMap<RequestKey, ResponseSnapshot>>,
}

impl MemoryStore {
    /// Creates an empty store with the given cache name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &RequestKey) -> Result<Option<ResponseSnapshot>> {
        let hit = self.entries.lock().unwrap().get(key).cloned();
        match &hit {
            Some(snapshot) => debug!(
                "cache '{}': hit for {key} ({} bytes)",
                self.name,
                snapshot.body.len()
            ),
            None => debug!("cache '{}': miss for {key}", self.name),
        }
        Ok(hit)
    }

    async fn put(&self, key: &RequestKey, snapshot: ResponseSnapshot) -> Result<()> {
        debug!(
            "cache '{}': store {key} ({} bytes)",
            self.name,
            snapshot.body.len()
        );
        self.entries.lock().unwrap().insert(key.clone(), snapshot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_none_when_absent() {
        let store = MemoryStore::new("test-v1");
        let hit = store.get(&RequestKey::get("/missing")).await.unwrap();
        assert!(hit.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = MemoryStore::new("test-v1");
        let key = RequestKey::get("/dashboard");
        let snapshot = ResponseSnapshot::new(
            200,
            vec![("content-type".to_string(), "text/html".to_string())],
            "<html>dashboard</html>",
        );

        store.put(&key, snapshot.clone()).await.unwrap();

        let hit = store.get(&key).await.unwrap().unwrap();
        assert_eq!(hit, snapshot);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn put_replaces_existing_entry() {
        let store = MemoryStore::new("test-v1");
        let key = RequestKey::get("/");

        store
            .put(&key, ResponseSnapshot::new(200, vec![], "old"))
            .await
            .unwrap();
        store
            .put(&key, ResponseSnapshot::new(200, vec![], "new"))
            .await
            .unwrap();

        let hit = store.get(&key).await.unwrap().unwrap();
        assert_eq!(&hit.body[..], b"new");
        assert_eq!(store.len(), 1);
    }
}
