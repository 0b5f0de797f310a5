use serde::{Deserialize, Serialize};

use crate::error::{PersistError, PersistResult};

/// The children of one directory, stored as a JSON array of keys.
///
/// Keys keep insertion order and appear at most once.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexRecord {
    keys: Vec<String>,
}

impl IndexRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the record stored at `index_key`.
    pub fn decode(text: &str, index_key: &str) -> PersistResult<Self> {
        serde_json::from_str(text).map_err(|e| PersistError::CorruptIndex {
            index_key: index_key.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn encode(&self) -> PersistResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Append `key` unless already listed. Returns `true` if it was added.
    pub fn insert(&mut self, key: &str) -> bool {
        if self.contains(key) {
            return false;
        }
        self.keys.push(key.to_string());
        true
    }

    /// Drop `key`. Returns `true` if it was listed.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.keys.len();
        self.keys.retain(|listed| listed != key);
        self.keys.len() != before
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|listed| listed == key)
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn into_keys(self) -> Vec<String> {
        self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
