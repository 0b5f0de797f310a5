use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::traits::KvStore;

/// In-memory, HashMap-based key-value store.
///
/// Intended for tests and embedding. Entries live behind a `RwLock` for safe
/// concurrent access. Every trait call is counted, so tests can assert that
/// an operation failed before touching the backend.
#[derive(Default)]
pub struct InMemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
    operations: AtomicUsize,
}

impl InMemoryKvStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.read_entries().map(|map| map.len()).unwrap_or(0)
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &str) -> bool {
        self.read_entries()
            .map(|map| map.contains_key(key))
            .unwrap_or(false)
    }

    /// Return a sorted list of all keys in the store.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .read_entries()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Remove all entries. The operation counter is left untouched.
    pub fn clear(&self) {
        if let Ok(mut map) = self.write_entries() {
            map.clear();
        }
    }

    /// Number of `get`/`set`/`remove` calls served so far.
    pub fn operations(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    fn read_entries(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<String, String>>> {
        self.entries
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".into()))
    }

    fn write_entries(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<String, String>>> {
        self.entries
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".into()))
    }

    fn count(&self) {
        self.operations.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.count();
        Ok(self.read_entries()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        self.count();
        self.write_entries()?.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.count();
        self.write_entries()?.remove(key);
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKvStore")
            .field("key_count", &self.len())
            .field("operations", &self.operations())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    // -----------------------------------------------------------------------
    // Core CRUD
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn set_and_get() {
        let store = InMemoryKvStore::new();
        store.set("a", "1".into()).await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));
        assert!(store.contains("a"));
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = InMemoryKvStore::new();
        assert!(store.get("missing").await.unwrap().is_none());
        assert!(!store.exists("missing").await.unwrap());
    }

    #[tokio::test]
    async fn set_overwrites() {
        let store = InMemoryKvStore::new();
        store.set("a", "1".into()).await.unwrap();
        store.set("a", "2".into()).await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("2"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let store = InMemoryKvStore::new();
        store.set("a", "1".into()).await.unwrap();
        store.remove("a").await.unwrap();
        store.remove("a").await.unwrap();
        assert!(store.is_empty());
    }

    // -----------------------------------------------------------------------
    // Utility methods
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn keys_are_sorted() {
        let store = InMemoryKvStore::new();
        for key in ["/b", "/a/_items", "/a"] {
            store.set(key, String::new()).await.unwrap();
        }
        assert_eq!(store.keys(), vec!["/a", "/a/_items", "/b"]);
    }

    #[tokio::test]
    async fn operations_are_counted() {
        let store = InMemoryKvStore::new();
        assert_eq!(store.operations(), 0);
        store.set("a", "1".into()).await.unwrap();
        store.get("a").await.unwrap();
        store.remove("a").await.unwrap();
        assert_eq!(store.operations(), 3);

        store.clear();
        assert_eq!(store.operations(), 3);
    }

    #[tokio::test]
    async fn arc_store_shares_state() {
        let store = Arc::new(InMemoryKvStore::new());
        let handle = Arc::clone(&store);
        handle.set("k", "v".into()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(store.operations(), 2);
    }

    #[tokio::test]
    async fn concurrent_writes_land() {
        let store = Arc::new(InMemoryKvStore::new());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.set(&format!("/k/{i}"), i.to_string()).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(store.len(), 16);
    }

    #[test]
    fn debug_format() {
        let store = InMemoryKvStore::new();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryKvStore"));
        assert!(debug.contains("key_count"));
    }
}
