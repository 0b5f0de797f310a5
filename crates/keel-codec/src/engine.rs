//! Model to container conversion and back.

use std::collections::BTreeMap;
use std::sync::Arc;

use keel_model::{Entity, EntityClass, ModelError, Value};
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};
use crate::node::{Container, Node};
use crate::registry::ClassRegistry;

/// How decoded values are written into a fresh model instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeserializePolicy {
    /// Every non-null value goes through the setter check; a stored value
    /// whose type no longer matches the declaration fails with
    /// [`ModelError::TypeMismatch`]. `null` resets the slot to unset.
    #[default]
    Validated,
    /// Values are written straight into the slots without type checks.
    Direct,
}

/// Convert a model (and every model nested in it) into a tagged container.
///
/// Fails with [`CodecError::UnsupportedScalar`] on `Date`, `RegExp`,
/// `Function`, or non-finite numbers.
///
/// `Undefined` is encoded as `null` and is not preserved: it decodes as
/// `Null`, i.e. an unset slot. A property declared `"Undefined"` therefore
/// reads back unset rather than holding `Value::Undefined`.
pub fn to_container(entity: &dyn Entity) -> CodecResult<Container> {
    container_at(entity, "")
}

fn container_at(entity: &dyn Entity, path: &str) -> CodecResult<Container> {
    let mut container = Container::new(entity.class_tag());
    for (descriptor, value) in entity.record().fields() {
        let field_path = join_key(path, &descriptor.name);
        container
            .data
            .insert(descriptor.name.clone(), encode_value(value, &field_path)?);
    }
    Ok(container)
}

fn encode_value(value: &Value, path: &str) -> CodecResult<Node> {
    Ok(match value {
        Value::Undefined | Value::Null => Node::Null,
        Value::Number(n) if n.is_finite() => Node::Number(*n),
        Value::Number(_) => return Err(unsupported("non-finite Number", path)),
        Value::String(s) => Node::String(s.clone()),
        Value::Boolean(b) => Node::Bool(*b),
        Value::Object(fields) => {
            let mut mapping = BTreeMap::new();
            for (key, item) in fields {
                mapping.insert(key.clone(), encode_value(item, &join_key(path, key))?);
            }
            Node::Mapping(mapping)
        }
        Value::Array(items) => Node::Sequence(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| encode_value(item, &format!("{path}[{i}]")))
                .collect::<CodecResult<_>>()?,
        ),
        Value::Date(_) => return Err(unsupported("Date", path)),
        Value::RegExp(_) => return Err(unsupported("RegExp", path)),
        Value::Function(_) => return Err(unsupported("Function", path)),
        Value::Model(entity) => Node::Tagged(container_at(entity.as_ref(), path)?),
    })
}

fn unsupported(kind: &str, path: &str) -> CodecError {
    CodecError::UnsupportedScalar {
        kind: kind.to_string(),
        path: path.to_string(),
    }
}

fn join_key(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

/// Serializes models to JSON text and rebuilds them through a
/// [`ClassRegistry`].
#[derive(Clone, Debug)]
pub struct SerializationEngine {
    registry: Arc<ClassRegistry>,
    policy: DeserializePolicy,
}

impl SerializationEngine {
    pub fn new(registry: Arc<ClassRegistry>) -> Self {
        Self {
            registry,
            policy: DeserializePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DeserializePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub fn policy(&self) -> DeserializePolicy {
        self.policy
    }

    /// Serialize a model to JSON text. Nothing is cached.
    ///
    /// Lossy for `Undefined`, see [`to_container`].
    pub fn serialize(&self, entity: &dyn Entity) -> CodecResult<String> {
        to_container(entity)?.encode()
    }

    /// Rebuild a model from JSON text.
    pub fn deserialize(&self, text: &str) -> CodecResult<Box<dyn Entity>> {
        let container = Container::decode(text)?;
        self.from_container(&container)
    }

    /// Rebuild a model and require it to be of class `E`.
    pub fn deserialize_as<E: EntityClass>(&self, text: &str) -> CodecResult<E> {
        let entity = self.deserialize(text)?;
        downcast_owned::<E>(entity)
    }

    /// Rebuild a model from its tagged container.
    pub fn from_container(&self, container: &Container) -> CodecResult<Box<dyn Entity>> {
        let mut entity = self.registry.instantiate(&container.class_tag)?;
        if entity.class_tag() != container.class_tag {
            return Err(CodecError::UnexpectedClass {
                expected: container.class_tag.clone(),
                actual: entity.class_tag().to_string(),
            });
        }

        for (key, node) in &container.data {
            if entity.record().schema().position(key).is_none() {
                return Err(ModelError::UnknownStateProperty {
                    class: container.class_tag.clone(),
                    property: key.clone(),
                }
                .into());
            }
            let value = self.decode_node(node)?;
            let record = entity.record_mut();
            match self.policy {
                DeserializePolicy::Validated if value.is_null() => record.unset(key)?,
                DeserializePolicy::Validated => record.set(key, value)?,
                DeserializePolicy::Direct => record.restore_slot(key, value)?,
            }
        }
        Ok(entity)
    }

    fn decode_node(&self, node: &Node) -> CodecResult<Value> {
        Ok(match node {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Boolean(*b),
            Node::Number(n) => Value::Number(*n),
            Node::String(s) => Value::String(s.clone()),
            Node::Sequence(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.decode_node(item))
                    .collect::<CodecResult<_>>()?,
            ),
            Node::Mapping(fields) => {
                let mut object = BTreeMap::new();
                for (key, item) in fields {
                    object.insert(key.clone(), self.decode_node(item)?);
                }
                Value::Object(object)
            }
            Node::Tagged(container) => Value::Model(self.from_container(container)?),
        })
    }
}

/// Unbox a decoded model as `E`, or report which class was found instead.
pub(crate) fn downcast_owned<E: EntityClass>(entity: Box<dyn Entity>) -> CodecResult<E> {
    entity.downcast::<E>().map(|boxed| *boxed).map_err(|other| {
        CodecError::UnexpectedClass {
            expected: E::CLASS_TAG.to_string(),
            actual: other.class_tag().to_string(),
        }
    })
}
