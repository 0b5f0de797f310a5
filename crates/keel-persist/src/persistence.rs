//! Store, restore and remove models under hierarchical keys.
//!
//! Every hierarchical key is listed in its directory's index record, which
//! is what a wildcard restore walks. Per directory, the payload write is
//! sequenced before the index read-modify-write.

use std::sync::Arc;

use keel_codec::{ClassRegistry, SerializationEngine};
use keel_model::{Entity, EntityClass};
use keel_store::KvStore;
use tracing::{debug, warn};

use crate::config::PersistConfig;
use crate::error::{PersistError, PersistResult};
use crate::index::IndexRecord;
use crate::key::{self, StorageKey};
use crate::locks::{DirectoryGuard, DirectoryLocks};

/// Outcome of [`IndexedPersistence::restore`].
#[derive(Debug)]
pub enum Restored {
    /// Nothing is stored under the key.
    NotFound,
    /// The model stored under a single key.
    One(Box<dyn Entity>),
    /// Every model indexed under a directory, in index order.
    Many(Vec<Box<dyn Entity>>),
}

impl Restored {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Restored::NotFound)
    }

    /// The single restored model, if this was a single-key restore that
    /// found one.
    pub fn into_one(self) -> Option<Box<dyn Entity>> {
        match self {
            Restored::One(entity) => Some(entity),
            _ => None,
        }
    }

    /// All restored models as a list.
    pub fn into_many(self) -> Vec<Box<dyn Entity>> {
        match self {
            Restored::NotFound => Vec::new(),
            Restored::One(entity) => vec![entity],
            Restored::Many(entities) => entities,
        }
    }
}

/// Model persistence with per-directory index records.
pub struct IndexedPersistence<S> {
    store: S,
    engine: SerializationEngine,
    locks: Option<DirectoryLocks>,
}

impl<S: KvStore> IndexedPersistence<S> {
    pub fn new(store: S, registry: Arc<ClassRegistry>) -> Self {
        Self::with_config(store, registry, PersistConfig::default())
    }

    pub fn with_config(store: S, registry: Arc<ClassRegistry>, config: PersistConfig) -> Self {
        let engine = SerializationEngine::new(registry).with_policy(config.deserialize_policy);
        Self {
            store,
            engine,
            locks: config.directory_locking.then(DirectoryLocks::new),
        }
    }

    pub fn backend(&self) -> &S {
        &self.store
    }

    pub fn engine(&self) -> &SerializationEngine {
        &self.engine
    }

    /// Persist `entity` under `key`, or under its class tag if no key is
    /// given.
    ///
    /// Hierarchical keys are added to their directory's index. Storing the
    /// same key again replaces the payload and leaves the index unchanged.
    pub async fn store(&self, entity: &dyn Entity, key: Option<&str>) -> PersistResult<()> {
        let key = key.unwrap_or_else(|| entity.class_tag());
        let parsed = StorageKey::parse_entry(key)?;
        let payload = self.engine.serialize(entity)?;

        let Some(directory) = parsed.directory() else {
            self.store.set(key, payload).await?;
            debug!(key = %key, class_tag = %entity.class_tag(), "stored model");
            return Ok(());
        };

        let _guard = self.lock(directory).await;
        self.store.set(key, payload).await?;

        let index_key = key::index_key(directory);
        let mut index = self.read_index(&index_key).await?.unwrap_or_default();
        if index.insert(key) {
            self.store.set(&index_key, index.encode()?).await?;
            debug!(key = %key, directory = %directory, entries = index.len(), "indexed key");
        }
        debug!(key = %key, class_tag = %entity.class_tag(), "stored model");
        Ok(())
    }

    /// Restore the model under `key`, or every model indexed under a
    /// directory for the wildcard form `<directory>/*`.
    pub async fn restore(&self, key: &str) -> PersistResult<Restored> {
        match StorageKey::parse(key)? {
            StorageKey::Wildcard { directory } => {
                let entities = self.restore_directory(directory).await?;
                debug!(key = %key, count = entities.len(), "restored directory");
                Ok(Restored::Many(entities))
            }
            StorageKey::Plain(_) | StorageKey::Entry { .. } => match self.store.get(key).await? {
                None => {
                    debug!(key = %key, "nothing stored");
                    Ok(Restored::NotFound)
                }
                Some(payload) => Ok(Restored::One(self.engine.deserialize(&payload)?)),
            },
        }
    }

    /// Restore the model under `key` as class `E`.
    pub async fn restore_as<E: EntityClass>(&self, key: &str) -> PersistResult<Option<E>> {
        let entity = match self.restore(key).await? {
            Restored::NotFound => return Ok(None),
            Restored::One(entity) => entity,
            Restored::Many(_) => {
                return Err(PersistError::InvalidKey {
                    key: key.to_string(),
                    reason: "typed restore needs a single key".into(),
                })
            }
        };
        entity
            .downcast::<E>()
            .map(|boxed| Some(*boxed))
            .map_err(|other| PersistError::UnexpectedClass {
                key: key.to_string(),
                expected: E::CLASS_TAG.to_string(),
                actual: other.class_tag().to_string(),
            })
    }

    /// Restore the model stored under the class tag of `E`, as written by
    /// `store(entity, None)`.
    pub async fn restore_default<E: EntityClass>(&self) -> PersistResult<Option<E>> {
        self.restore_as::<E>(E::CLASS_TAG).await
    }

    /// Delete the payload under `key` and drop it from its directory index.
    ///
    /// An index left empty is deleted. Directories above that are untouched.
    pub async fn remove(&self, key: &str) -> PersistResult<()> {
        let parsed = StorageKey::parse_entry(key)?;
        let Some(directory) = parsed.directory() else {
            self.store.remove(key).await?;
            debug!(key = %key, "removed model");
            return Ok(());
        };

        let _guard = self.lock(directory).await;
        self.store.remove(key).await?;

        let index_key = key::index_key(directory);
        if let Some(mut index) = self.read_index(&index_key).await? {
            let listed = index.remove(key);
            if index.is_empty() {
                self.store.remove(&index_key).await?;
                debug!(directory = %directory, "deleted empty index");
            } else if listed {
                self.store.set(&index_key, index.encode()?).await?;
            }
        }
        debug!(key = %key, "removed model");
        Ok(())
    }

    /// Keys currently indexed under `directory`, in index order.
    ///
    /// `""` and `"/"` both name the root directory.
    pub async fn list(&self, directory: &str) -> PersistResult<Vec<String>> {
        let directory = key::normalize_directory(directory);
        let index_key = key::index_key(directory);
        Ok(self
            .read_index(&index_key)
            .await?
            .map(IndexRecord::into_keys)
            .unwrap_or_default())
    }

    async fn restore_directory(&self, directory: &str) -> PersistResult<Vec<Box<dyn Entity>>> {
        let _guard = self.lock(directory).await;
        let index_key = key::index_key(directory);
        let Some(index) = self.read_index(&index_key).await? else {
            return Ok(Vec::new());
        };

        let mut entities = Vec::with_capacity(index.len());
        for child in index.keys() {
            let Some(payload) = self.store.get(child).await? else {
                warn!(index_key = %index_key, key = %child, "index lists a missing payload");
                return Err(PersistError::IndexInconsistency {
                    index_key,
                    key: child.clone(),
                });
            };
            entities.push(self.engine.deserialize(&payload)?);
        }
        Ok(entities)
    }

    async fn read_index(&self, index_key: &str) -> PersistResult<Option<IndexRecord>> {
        match self.store.get(index_key).await? {
            None => Ok(None),
            Some(text) => IndexRecord::decode(&text, index_key).map(Some),
        }
    }

    async fn lock(&self, directory: &str) -> Option<DirectoryGuard<'_>> {
        match &self.locks {
            Some(locks) => Some(locks.lock(directory).await),
            None => None,
        }
    }
}

impl<S> std::fmt::Debug for IndexedPersistence<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexedPersistence")
            .field("engine", &self.engine)
            .field("directory_locking", &self.locks.is_some())
            .finish()
    }
}
