//! Typed model records for Keel.
//!
//! A model is a struct generated by [`entity!`] that wraps a [`Record`]: a
//! class tag, a schema of named properties with a required [`TypeTag`], and
//! one value slot per property. Every write goes through the same type check,
//! so a model can only ever hold values its schema allows.
//!
//! # Key Types
//!
//! - [`TypeTag`] -- Closed vocabulary of property types plus exact class tags
//! - [`Value`] -- Owned runtime value a slot can hold
//! - [`PropertyDescriptor`] / [`Schema`] -- Declared properties of a class
//! - [`Record`] -- Slot storage with validated get/set and state conversion
//! - [`Entity`] / [`EntityClass`] -- Object-safe and static model traits
//! - [`BaseModel`] -- The property-less base model (class tag `"Model"`)
//!
//! # Example
//!
//! ```
//! use keel_model::{entity, EntityClass, Value};
//!
//! entity! {
//!     /// A user profile.
//!     pub struct Profile("Profile") {
//!         name: "String" => get_name / set_name,
//!         age: "Number" => get_age / set_age,
//!     }
//! }
//!
//! let mut profile = Profile::new().unwrap();
//! profile.set_name("ada").unwrap();
//! assert_eq!(profile.get_name(), &Value::from("ada"));
//! assert!(profile.set_age("forty").is_err());
//! ```

pub mod entity;
pub mod error;
pub mod property;
pub mod record;
pub mod tag;
pub mod value;

pub use entity::{BaseModel, Entity, EntityClass};
pub use error::{ModelError, ModelResult};
pub use property::{PropertyDescriptor, Schema, PRIVATE_PREFIX};
pub use record::{Record, State};
pub use tag::{TypeTag, MODEL_CLASS_TAG};
pub use value::{Callable, Value};
