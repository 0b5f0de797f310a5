//! Class-aware serialization for Keel models.
//!
//! A model serializes to a *tagged container*: a JSON object carrying the
//! model's class tag under [`CLASS_TAG_KEY`] and its property values under
//! [`DATA_KEY`]. Nested models become nested containers, so plain JSON and
//! typed models can mix freely inside one `Object` or `Array` property; the
//! tag field alone tells them apart.
//!
//! # Key Types
//!
//! - [`ClassRegistry`] -- Class tag to factory mapping used to rebuild models
//! - [`Node`] / [`Container`] -- In-memory tagged form, separate from JSON text
//! - [`SerializationEngine`] -- Model to container to JSON, and back
//! - [`DeserializePolicy`] -- Validated (setter-checked) or direct slot writes
//!
//! # Design Rules
//!
//! 1. `Date`, `RegExp` and `Function` values are rejected, never stringified.
//! 2. An unregistered class tag is an error, never a stand-in instance.
//! 3. Registering a class tag twice is an error.
//! 4. Container `data` keys are public property names, in both directions.

pub mod engine;
pub mod error;
pub mod node;
pub mod registry;

pub use engine::{to_container, DeserializePolicy, SerializationEngine};
pub use error::{CodecError, CodecResult};
pub use node::{Container, Node, CLASS_TAG_KEY, DATA_KEY};
pub use registry::{ClassRegistry, Factory};
