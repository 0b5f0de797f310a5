//! Property declarations and per-class schemas.
//!
//! Valid property names:
//! - Must be non-empty
//! - Must not start with [`PRIVATE_PREFIX`], which is reserved for slots
//! - Must be unique within one class

use crate::error::{ModelError, ModelResult};
use crate::tag::TypeTag;

/// Prefix reserved for private slots; declared names may not start with it.
pub const PRIVATE_PREFIX: char = '_';

/// A declared property: public name plus required type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub tag: TypeTag,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            tag,
        }
    }

    /// Build a descriptor from a type name such as `"Number"` or `"MyModel"`.
    pub fn parse(name: impl Into<String>, type_name: &str) -> ModelResult<Self> {
        let name = name.into();
        let tag = TypeTag::from_name(type_name).ok_or_else(|| ModelError::InvalidPropertyType {
            property: name.clone(),
            type_name: type_name.to_string(),
        })?;
        Ok(Self { name, tag })
    }
}

/// Validate a property name, returning `Ok(())` if valid.
pub fn validate_property_name(name: &str) -> ModelResult<()> {
    if name.is_empty() {
        return Err(ModelError::InvalidPropertyName {
            name: name.to_string(),
            reason: "property name must not be empty".into(),
        });
    }
    if name.starts_with(PRIVATE_PREFIX) {
        return Err(ModelError::InvalidPropertyName {
            name: name.to_string(),
            reason: format!("must not start with {PRIVATE_PREFIX:?}"),
        });
    }
    Ok(())
}

/// The ordered, validated property list of one class.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schema {
    properties: Vec<PropertyDescriptor>,
}

impl Schema {
    /// Validate `descriptors` for the class `class_tag`.
    pub fn new(
        class_tag: &str,
        descriptors: impl IntoIterator<Item = PropertyDescriptor>,
    ) -> ModelResult<Self> {
        let mut properties: Vec<PropertyDescriptor> = Vec::new();
        for descriptor in descriptors {
            validate_property_name(&descriptor.name)?;
            if properties.iter().any(|p| p.name == descriptor.name) {
                return Err(ModelError::DuplicateProperty {
                    class: class_tag.to_string(),
                    property: descriptor.name,
                });
            }
            properties.push(descriptor);
        }
        Ok(Self { properties })
    }

    /// Build a schema from `(name, type name)` pairs.
    pub fn from_pairs(class_tag: &str, pairs: &[(&str, &str)]) -> ModelResult<Self> {
        let descriptors = pairs
            .iter()
            .map(|(name, type_name)| PropertyDescriptor::parse(*name, type_name))
            .collect::<ModelResult<Vec<_>>>()?;
        Self::new(class_tag, descriptors)
    }

    /// Slot index of the named property.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }

    pub(crate) fn at(&self, index: usize) -> &PropertyDescriptor {
        &self.properties[index]
    }

    pub fn get(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
