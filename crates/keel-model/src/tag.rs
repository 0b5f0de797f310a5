use std::fmt;

use crate::value::Value;

/// Class tag of the property-less base model.
pub const MODEL_CLASS_TAG: &str = "Model";

/// The declared type of a model property.
///
/// The eleven built-in tags form a closed vocabulary. [`TypeTag::Class`]
/// names one concrete model class by its class tag; model values are
/// matched against it by exact tag, never by any "is-a" relation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    Number,
    String,
    Boolean,
    Object,
    Array,
    /// The base model, class tag [`MODEL_CLASS_TAG`].
    Model,
    Date,
    RegExp,
    Undefined,
    Null,
    Function,
    /// A concrete model class, identified by its class tag.
    Class(String),
}

impl TypeTag {
    /// Classify any value into exactly one tag.
    ///
    /// Policy branches:
    /// - `Null` classifies as [`TypeTag::Object`], so null satisfies an
    ///   `Object` property.
    /// - A model classifies as its own class tag: [`TypeTag::Model`] for the
    ///   base model, [`TypeTag::Class`] for everything else.
    pub fn classify(value: &Value) -> TypeTag {
        match value {
            Value::Undefined => TypeTag::Undefined,
            Value::Null => TypeTag::Object,
            Value::Number(_) => TypeTag::Number,
            Value::String(_) => TypeTag::String,
            Value::Boolean(_) => TypeTag::Boolean,
            Value::Object(_) => TypeTag::Object,
            Value::Array(_) => TypeTag::Array,
            Value::Date(_) => TypeTag::Date,
            Value::RegExp(_) => TypeTag::RegExp,
            Value::Function(_) => TypeTag::Function,
            Value::Model(entity) => Self::for_class(entity.class_tag()),
        }
    }

    /// The tag a model with the given class tag classifies as.
    pub fn for_class(class_tag: &str) -> TypeTag {
        if class_tag == MODEL_CLASS_TAG {
            TypeTag::Model
        } else {
            TypeTag::Class(class_tag.to_string())
        }
    }

    /// Whether `value` satisfies this declared type.
    ///
    /// Equal to `classify(value) == *self`, except that `Null` is also
    /// accepted by a declared [`TypeTag::Null`].
    pub fn accepts(&self, value: &Value) -> bool {
        if matches!(value, Value::Null) && *self == TypeTag::Null {
            return true;
        }
        Self::classify(value) == *self
    }

    /// Parse a type name as written in a property declaration.
    ///
    /// Built-in names map to their tag; any other identifier (ASCII letter
    /// followed by letters, digits or `_`) is taken as a class tag. Returns
    /// `None` for anything else.
    pub fn from_name(name: &str) -> Option<TypeTag> {
        let tag = match name {
            "Number" => TypeTag::Number,
            "String" => TypeTag::String,
            "Boolean" => TypeTag::Boolean,
            "Object" => TypeTag::Object,
            "Array" => TypeTag::Array,
            "Model" => TypeTag::Model,
            "Date" => TypeTag::Date,
            "RegExp" => TypeTag::RegExp,
            "Undefined" => TypeTag::Undefined,
            "Null" => TypeTag::Null,
            "Function" => TypeTag::Function,
            other if is_class_identifier(other) => TypeTag::Class(other.to_string()),
            _ => return None,
        };
        Some(tag)
    }

    /// The type name as it appears in declarations and error messages.
    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::Number => "Number",
            TypeTag::String => "String",
            TypeTag::Boolean => "Boolean",
            TypeTag::Object => "Object",
            TypeTag::Array => "Array",
            TypeTag::Model => MODEL_CLASS_TAG,
            TypeTag::Date => "Date",
            TypeTag::RegExp => "RegExp",
            TypeTag::Undefined => "Undefined",
            TypeTag::Null => "Null",
            TypeTag::Function => "Function",
            TypeTag::Class(tag) => tag,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_class_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{BaseModel, EntityClass};
    use std::collections::BTreeMap;

    crate::entity! {
        struct Probe("Probe") {}
    }

    #[test]
    fn classify_scalars() {
        assert_eq!(TypeTag::classify(&Value::Number(1.5)), TypeTag::Number);
        assert_eq!(TypeTag::classify(&Value::from("x")), TypeTag::String);
        assert_eq!(TypeTag::classify(&Value::Boolean(true)), TypeTag::Boolean);
        assert_eq!(TypeTag::classify(&Value::Undefined), TypeTag::Undefined);
    }

    #[test]
    fn classify_null_as_object() {
        assert_eq!(TypeTag::classify(&Value::Null), TypeTag::Object);
        assert!(TypeTag::Object.accepts(&Value::Null));
        assert!(TypeTag::Null.accepts(&Value::Null));
        assert!(!TypeTag::Number.accepts(&Value::Null));
    }

    #[test]
    fn classify_containers() {
        assert_eq!(TypeTag::classify(&Value::Array(vec![])), TypeTag::Array);
        assert_eq!(
            TypeTag::classify(&Value::Object(BTreeMap::new())),
            TypeTag::Object
        );
    }

    #[test]
    fn classify_unsupported_kinds() {
        assert_eq!(TypeTag::classify(&Value::regexp("a+")), TypeTag::RegExp);
        assert_eq!(
            TypeTag::classify(&Value::date(chrono::Utc::now())),
            TypeTag::Date
        );
        assert_eq!(
            TypeTag::classify(&Value::function(|_| Value::Null)),
            TypeTag::Function
        );
    }

    #[test]
    fn classify_models_by_exact_tag() {
        let base = Value::entity(BaseModel::new().unwrap());
        assert_eq!(TypeTag::classify(&base), TypeTag::Model);

        let probe = Value::entity(Probe::new().unwrap());
        assert_eq!(TypeTag::classify(&probe), TypeTag::Class("Probe".into()));
        assert!(!TypeTag::Model.accepts(&probe));
        assert!(TypeTag::Class(Probe::CLASS_TAG.into()).accepts(&probe));
    }

    #[test]
    fn from_name_builtins_and_classes() {
        assert_eq!(TypeTag::from_name("Number"), Some(TypeTag::Number));
        assert_eq!(TypeTag::from_name("Model"), Some(TypeTag::Model));
        assert_eq!(
            TypeTag::from_name("TestModel"),
            Some(TypeTag::Class("TestModel".into()))
        );
        assert_eq!(TypeTag::from_name(""), None);
        assert_eq!(TypeTag::from_name("not a type"), None);
        assert_eq!(TypeTag::from_name("9Lives"), None);
    }

    #[test]
    fn display_matches_declared_name() {
        assert_eq!(TypeTag::Number.to_string(), "Number");
        assert_eq!(TypeTag::Class("Foo".into()).to_string(), "Foo");
        for tag in [TypeTag::Array, TypeTag::RegExp, TypeTag::Function] {
            assert_eq!(TypeTag::from_name(tag.as_str()), Some(tag));
        }
    }
}
