use keel_codec::DeserializePolicy;
use serde::{Deserialize, Serialize};

/// Configuration for [`IndexedPersistence`](crate::IndexedPersistence).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistConfig {
    /// How restored payloads are written into fresh model instances.
    pub deserialize_policy: DeserializePolicy,
    /// Serialize index updates per directory within this process.
    ///
    /// When `false`, concurrent `store`/`remove` calls on one directory may
    /// lose index entries.
    pub directory_locking: bool,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            deserialize_policy: DeserializePolicy::Validated,
            directory_locking: true,
        }
    }
}

impl PersistConfig {
    /// No in-process locking; callers coordinate access themselves.
    pub fn unguarded() -> Self {
        Self {
            directory_locking: false,
            ..Default::default()
        }
    }

    pub fn with_policy(mut self, policy: DeserializePolicy) -> Self {
        self.deserialize_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PersistConfig::default();
        assert_eq!(config.deserialize_policy, DeserializePolicy::Validated);
        assert!(config.directory_locking);
        assert!(!PersistConfig::unguarded().directory_locking);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: PersistConfig = serde_json::from_str(r#"{"directory_locking":false}"#).unwrap();
        assert_eq!(config, PersistConfig::unguarded());

        let config: PersistConfig =
            serde_json::from_str(r#"{"deserialize_policy":"direct"}"#).unwrap();
        assert_eq!(
            config,
            PersistConfig::default().with_policy(DeserializePolicy::Direct)
        );
    }
}
