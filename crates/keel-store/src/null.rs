use async_trait::async_trait;

use crate::error::StoreResult;
use crate::traits::KvStore;

/// A store that remembers nothing.
///
/// Writes and removals succeed and are discarded; every read misses. Useful
/// where persistence is optional and switched off.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullKvStore;

impl NullKvStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl KvStore for NullKvStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: String) -> StoreResult<()> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_are_discarded() {
        let store = NullKvStore::new();
        store.set("a", "1".into()).await.unwrap();
        assert!(store.get("a").await.unwrap().is_none());
        assert!(!store.exists("a").await.unwrap());
        store.remove("a").await.unwrap();
    }
}
