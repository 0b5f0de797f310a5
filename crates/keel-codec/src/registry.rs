//! Class tag to factory mapping used to rebuild models.
//!
//! A registry is created at startup, populated with explicit
//! [`ClassRegistry::register`] calls, then shared (typically behind an `Arc`)
//! with every [`SerializationEngine`](crate::SerializationEngine) that needs
//! it. Serialization and deserialization only ever read it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use keel_model::{Entity, EntityClass, ModelResult, State};
use tracing::debug;

use crate::error::{CodecError, CodecResult};

/// Produces a default instance of one model class.
pub type Factory = Arc<dyn Fn() -> ModelResult<Box<dyn Entity>> + Send + Sync>;

/// Registry of model classes keyed by class tag.
#[derive(Default)]
pub struct ClassRegistry {
    factories: HashMap<String, Factory>,
}

impl ClassRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model class under its [`EntityClass::CLASS_TAG`].
    pub fn register<E: EntityClass>(&mut self) -> CodecResult<()> {
        self.register_factory(E::CLASS_TAG, || {
            let entity: Box<dyn Entity> = Box::new(E::new_default()?);
            Ok(entity)
        })
    }

    /// Register an arbitrary factory for `class_tag`.
    ///
    /// Fails with [`CodecError::DuplicateRegistration`] if the tag is taken.
    pub fn register_factory<F>(
        &mut self,
        class_tag: impl Into<String>,
        factory: F,
    ) -> CodecResult<()>
    where
        F: Fn() -> ModelResult<Box<dyn Entity>> + Send + Sync + 'static,
    {
        let class_tag = class_tag.into();
        if self.factories.contains_key(&class_tag) {
            return Err(CodecError::DuplicateRegistration { class_tag });
        }
        debug!(class_tag = %class_tag, "registered model class");
        self.factories.insert(class_tag, Arc::new(factory));
        Ok(())
    }

    /// Look up the factory for `class_tag`.
    pub fn resolve(&self, class_tag: &str) -> CodecResult<&Factory> {
        self.factories
            .get(class_tag)
            .ok_or_else(|| CodecError::UnknownClass {
                class_tag: class_tag.to_string(),
            })
    }

    /// Create a default instance of the registered class.
    pub fn instantiate(&self, class_tag: &str) -> CodecResult<Box<dyn Entity>> {
        let factory = self.resolve(class_tag)?;
        Ok(factory()?)
    }

    /// Create an instance of the registered class populated from `state`.
    pub fn from_state(&self, class_tag: &str, state: &State) -> CodecResult<Box<dyn Entity>> {
        let mut entity = self.instantiate(class_tag)?;
        entity.populate_from_state(state)?;
        Ok(entity)
    }

    pub fn contains(&self, class_tag: &str) -> bool {
        self.factories.contains_key(class_tag)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Sorted list of registered class tags.
    pub fn class_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.factories.keys().cloned().collect();
        tags.sort();
        tags
    }

    /// Forget every registration.
    pub fn clear(&mut self) {
        self.factories.clear();
    }
}

impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("classes", &self.class_tags())
            .finish()
    }
}
