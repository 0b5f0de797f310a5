//! Indexed hierarchical persistence for Keel models.
//!
//! Models are stored as tagged JSON payloads in a [`KvStore`](keel_store::KvStore).
//! Keys starting with `/` form a hierarchy: each directory keeps an index
//! record at `<directory>/_items` listing its children, which makes
//! wildcard restore (`/a/*`) and cleanup on removal possible.
//!
//! # Key Types
//!
//! - [`IndexedPersistence`] -- store, restore, remove and list
//! - [`StorageKey`] -- validated key: plain, hierarchical entry or wildcard
//! - [`IndexRecord`] -- insertion-ordered, de-duplicated child list
//! - [`DirectoryLocks`] / [`DirectoryGuard`] -- per-directory exclusion for index updates
//! - [`PersistConfig`] -- decode policy and locking switch
//!
//! # Design Rules
//!
//! 1. Invalid keys fail before any backend call.
//! 2. The payload is written before its index entry, and removed before it.
//! 3. An index that becomes empty is deleted; nothing above it is touched.
//! 4. An index entry without a payload fails a wildcard restore outright.
//! 5. Nothing is atomic across keys; a failure midway is not rolled back.

pub mod config;
pub mod error;
pub mod index;
pub mod key;
pub mod locks;
pub mod persistence;

pub use config::PersistConfig;
pub use error::{PersistError, PersistResult};
pub use index::IndexRecord;
pub use key::{index_key, StorageKey, INDEX_SEGMENT};
pub use locks::{DirectoryGuard, DirectoryLocks};
pub use persistence::{IndexedPersistence, Restored};
