//! Asynchronous key-value storage for Keel.
//!
//! Persistence only ever needs three operations on string keys and string
//! values: get, set and remove. This crate defines that boundary and ships
//! the backends used in tests and embedding.
//!
//! # Storage Backends
//!
//! All backends implement the [`KvStore`] trait:
//!
//! - [`InMemoryKvStore`] -- `HashMap`-based store for tests and embedding
//! - [`NullKvStore`] -- discards writes and never finds anything
//!
//! # Design Rules
//!
//! 1. The store never interprets values -- it is a pure key-value store.
//! 2. Every operation is atomic on its own key; nothing spans keys.
//! 3. All backend errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod null;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryKvStore;
pub use null::NullKvStore;
pub use traits::KvStore;
