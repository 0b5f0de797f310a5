//! Slot storage shared by every model.
//!
//! A [`Record`] owns one [`Value`] per declared property. All writes except
//! [`Record::restore_slot`] are checked against the declared [`TypeTag`].

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{ModelError, ModelResult};
use crate::property::{PropertyDescriptor, Schema};
use crate::tag::TypeTag;
use crate::value::Value;

/// Plain mapping from public property name to value.
pub type State = BTreeMap<String, Value>;

static UNSET: Value = Value::Null;

/// The typed slots of one model instance.
#[derive(Clone, Debug)]
pub struct Record {
    class_tag: String,
    schema: Arc<Schema>,
    slots: Vec<Value>,
}

impl Record {
    /// Declare a record; every slot starts unset (`Value::Null`).
    pub fn new(
        class_tag: impl Into<String>,
        descriptors: impl IntoIterator<Item = PropertyDescriptor>,
    ) -> ModelResult<Self> {
        let class_tag = class_tag.into();
        let schema = Schema::new(&class_tag, descriptors)?;
        Ok(Self::with_schema(class_tag, Arc::new(schema)))
    }

    /// Create a record over an already validated schema.
    pub fn with_schema(class_tag: impl Into<String>, schema: Arc<Schema>) -> Self {
        let slots = vec![Value::Null; schema.len()];
        Self {
            class_tag: class_tag.into(),
            schema,
            slots,
        }
    }

    pub fn class_tag(&self) -> &str {
        &self.class_tag
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Current value of a declared property.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.position(name).map(|index| &self.slots[index])
    }

    /// Current value of a property, `Null` if the name is not declared.
    pub fn value(&self, name: &str) -> &Value {
        self.get(name).unwrap_or(&UNSET)
    }

    /// Type-checked assignment.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> ModelResult<()> {
        let value = value.into();
        let index = self.check(name, &value)?;
        self.slots[index] = value;
        Ok(())
    }

    /// Validate `value` for the named property without assigning it.
    ///
    /// Returns the slot index on success.
    pub fn check(&self, name: &str, value: &Value) -> ModelResult<usize> {
        let index = self
            .schema
            .position(name)
            .ok_or_else(|| ModelError::UnknownProperty {
                class: self.class_tag.clone(),
                property: name.to_string(),
            })?;
        self.check_at(index, value)?;
        Ok(index)
    }

    fn check_at(&self, index: usize, value: &Value) -> ModelResult<()> {
        let descriptor = self.schema.at(index);
        if descriptor.tag.accepts(value) {
            Ok(())
        } else {
            Err(ModelError::TypeMismatch {
                property: descriptor.name.clone(),
                expected: descriptor.tag.clone(),
                actual: TypeTag::classify(value),
            })
        }
    }

    /// Reset a property to the unset value.
    pub fn unset(&mut self, name: &str) -> ModelResult<()> {
        self.restore_slot(name, Value::Null)
    }

    /// Assign a slot without type checking.
    ///
    /// Only the name is verified. Used by decoders configured for direct slot
    /// assignment.
    pub fn restore_slot(&mut self, name: &str, value: Value) -> ModelResult<()> {
        let index = self
            .schema
            .position(name)
            .ok_or_else(|| ModelError::UnknownProperty {
                class: self.class_tag.clone(),
                property: name.to_string(),
            })?;
        self.slots[index] = value;
        Ok(())
    }

    /// Declared properties paired with their current values, in declaration
    /// order.
    pub fn fields(&self) -> impl Iterator<Item = (&PropertyDescriptor, &Value)> {
        self.schema.iter().zip(self.slots.iter())
    }

    /// Plain mapping of every property to its current value.
    pub fn create_state(&self) -> State {
        self.fields()
            .map(|(descriptor, value)| (descriptor.name.clone(), value.clone()))
            .collect()
    }

    /// Assign every entry of `state`, validating each like a setter.
    ///
    /// All entries are checked before any is assigned, so a failing call
    /// leaves the record unchanged.
    pub fn populate_from_state(&mut self, state: &State) -> ModelResult<()> {
        let mut staged = Vec::with_capacity(state.len());
        for (name, value) in state {
            let index =
                self.schema
                    .position(name)
                    .ok_or_else(|| ModelError::UnknownStateProperty {
                        class: self.class_tag.clone(),
                        property: name.clone(),
                    })?;
            self.check_at(index, value)?;
            staged.push((index, value.clone()));
        }
        for (index, value) in staged {
            self.slots[index] = value;
        }
        Ok(())
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.class_tag == other.class_tag && self.slots == other.slots
    }
}
