use keel_codec::CodecError;
use keel_store::StoreError;

/// Errors from persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The key violates the storage key grammar. Raised before any backend
    /// call.
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// A directory index lists a key whose payload is missing.
    #[error("index {index_key} lists {key} but no payload is stored there")]
    IndexInconsistency { index_key: String, key: String },

    /// An index record is not a JSON array of keys.
    #[error("corrupt index record at {index_key}: {reason}")]
    CorruptIndex { index_key: String, reason: String },

    /// A restored record is not of the requested class.
    #[error("expected {expected} at {key}, found {actual}")]
    UnexpectedClass {
        key: String,
        expected: String,
        actual: String,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;
