//! Error types for serialization and the class registry.

use keel_model::ModelError;
use thiserror::Error;

/// Errors that can occur while encoding or decoding models.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A value kind that has no JSON representation.
    #[error("cannot serialize {kind} value at {path}")]
    UnsupportedScalar { kind: String, path: String },

    /// The input is not a well-formed tagged container.
    #[error("invalid container: {0}")]
    InvalidContainer(String),

    /// The class tag has no registered factory.
    #[error("unknown class {class_tag}; register it before deserializing")]
    UnknownClass { class_tag: String },

    /// The class tag is already registered.
    #[error("class {class_tag} is already registered")]
    DuplicateRegistration { class_tag: String },

    /// A decoded model is not of the requested class.
    #[error("expected class {expected}, found {actual}")]
    UnexpectedClass { expected: String, actual: String },

    /// JSON text could not be parsed or produced.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A decoded value violated the model's schema.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
