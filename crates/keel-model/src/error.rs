use thiserror::Error;

use crate::tag::TypeTag;

/// Errors produced while declaring or mutating model records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A property name is empty or starts with the private prefix.
    #[error("invalid property name {name:?}: {reason}")]
    InvalidPropertyName { name: String, reason: String },

    /// A property's declared type is not a known type or class tag.
    #[error("invalid type {type_name:?} declared for property {property}")]
    InvalidPropertyType { property: String, type_name: String },

    /// The same property name was declared twice for one class.
    #[error("property {property} declared twice in {class}")]
    DuplicateProperty { class: String, property: String },

    /// A value's classified type differs from the declared type.
    #[error("{property} is {expected}, got {actual}")]
    TypeMismatch {
        property: String,
        expected: TypeTag,
        actual: TypeTag,
    },

    /// A state mapping names a property the class does not declare.
    #[error("property {property} does not exist in {class}")]
    UnknownStateProperty { class: String, property: String },

    /// A by-name access targets a property the class does not declare.
    #[error("{class} has no property {property}")]
    UnknownProperty { class: String, property: String },
}

/// Result alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
