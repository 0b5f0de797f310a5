use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreResult;

/// Asynchronous string key-value store.
///
/// All implementations must satisfy these invariants:
/// - `get` after a completed `set` on the same key observes that value.
/// - `remove` of an absent key succeeds.
/// - Values are opaque: the store never inspects or rewrites them.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> StoreResult<()>;

    /// Delete `key`. Idempotent.
    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// Check whether a key exists.
    ///
    /// Default implementation uses `get()`.
    async fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key).await?.is_some())
    }
}

#[async_trait]
impl<T: KvStore + ?Sized> KvStore for Arc<T> {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key).await
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        (**self).exists(key).await
    }
}
