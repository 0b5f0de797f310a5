use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::entity::Entity;

/// A shared, callable function value.
///
/// Two callables are equal only if they are the same allocation.
#[derive(Clone)]
pub struct Callable(Arc<dyn Fn(&[Value]) -> Value + Send + Sync>);

impl Callable {
    pub fn new(f: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callable(..)")
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A value held by a model slot or nested inside one.
///
/// Values form an owned tree: a nested model is boxed into its parent, so a
/// value graph can never contain a cycle.
#[derive(Clone, Debug)]
pub enum Value {
    Undefined,
    /// The neutral "unset" value every slot starts with.
    Null,
    Number(f64),
    String(String),
    Boolean(bool),
    Object(BTreeMap<String, Value>),
    Array(Vec<Value>),
    Date(DateTime<Utc>),
    /// A regular expression, kept as its source pattern.
    RegExp(String),
    Function(Callable),
    Model(Box<dyn Entity>),
}

impl Value {
    /// Wrap a model.
    pub fn entity<E: Entity>(entity: E) -> Self {
        Value::Model(Box::new(entity))
    }

    pub fn date(at: DateTime<Utc>) -> Self {
        Value::Date(at)
    }

    pub fn regexp(pattern: impl Into<String>) -> Self {
        Value::RegExp(pattern.into())
    }

    pub fn function(f: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        Value::Function(Callable::new(f))
    }

    /// Build an `Object` from key/value pairs.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&(dyn Entity + 'static)> {
        match self {
            Value::Model(entity) => Some(entity.as_ref()),
            _ => None,
        }
    }

    /// Borrow a nested model as its concrete type.
    pub fn downcast_entity<E: Entity>(&self) -> Option<&E> {
        self.as_entity()?.downcast_ref::<E>()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::RegExp(a), Value::RegExp(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Model(a), Value::Model(b)) => a.record() == b.record(),
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Object(map)
    }
}

impl From<Box<dyn Entity>> for Value {
    fn from(entity: Box<dyn Entity>) -> Self {
        Value::Model(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{BaseModel, EntityClass};

    #[test]
    fn conversions() {
        assert_eq!(Value::from(3), Value::Number(3.0));
        assert_eq!(Value::from(2.5), Value::Number(2.5));
        assert_eq!(Value::from("a"), Value::String("a".into()));
        assert_eq!(Value::from(false), Value::Boolean(false));
        assert_eq!(Value::from(vec![Value::Null]), Value::Array(vec![Value::Null]));
    }

    #[test]
    fn object_builder() {
        let obj = Value::object([("a", Value::from(1)), ("b", Value::from("x"))]);
        let map = obj.as_object().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["b"].as_str(), Some("x"));
    }

    #[test]
    fn callables_compare_by_identity() {
        let f = Callable::new(|args| args.first().cloned().unwrap_or(Value::Null));
        let g = f.clone();
        assert_eq!(Value::Function(f.clone()), Value::Function(g));
        assert_ne!(
            Value::Function(f.clone()),
            Value::function(|_| Value::Null)
        );
        assert_eq!(f.call(&[Value::from(7)]), Value::from(7));
    }

    #[test]
    fn models_compare_by_tag_and_slots() {
        let a = Value::entity(BaseModel::new().unwrap());
        let b = Value::entity(BaseModel::new().unwrap());
        assert_eq!(a, b);
        assert!(a.downcast_entity::<BaseModel>().is_some());
        assert_eq!(a.as_entity().unwrap().class_tag(), BaseModel::CLASS_TAG);
    }

    #[test]
    fn nan_is_not_equal_to_itself() {
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }
}
