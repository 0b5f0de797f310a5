//! The in-memory tagged form and its JSON encoding.
//!
//! Wire format of one container:
//! ```text
//! { "__KEEL_MODEL_CLASS_NAME__": "<class tag>", "data": { "<property>": <node>, ... } }
//! ```
//! A JSON object is read as a [`Node::Tagged`] container if and only if it
//! carries [`CLASS_TAG_KEY`]; every other object is a plain [`Node::Mapping`].

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value as Json};

use crate::error::{CodecError, CodecResult};

/// Field carrying the class tag of a serialized model.
pub const CLASS_TAG_KEY: &str = "__KEEL_MODEL_CLASS_NAME__";

/// Field carrying the property values of a serialized model.
pub const DATA_KEY: &str = "data";

/// One serialized value.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Sequence(Vec<Node>),
    Mapping(BTreeMap<String, Node>),
    Tagged(Container),
}

/// A serialized model: class tag plus property nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Container {
    pub class_tag: String,
    pub data: BTreeMap<String, Node>,
}

impl Container {
    pub fn new(class_tag: impl Into<String>) -> Self {
        Self {
            class_tag: class_tag.into(),
            data: BTreeMap::new(),
        }
    }

    /// Encode as JSON text.
    pub fn encode(&self) -> CodecResult<String> {
        Ok(serde_json::to_string(&self.to_json()?)?)
    }

    /// Decode JSON text that must hold a tagged container at its top level.
    pub fn decode(text: &str) -> CodecResult<Self> {
        let json: Json = serde_json::from_str(text)?;
        Self::from_json(json)
    }

    pub fn to_json(&self) -> CodecResult<Json> {
        let mut data = Map::with_capacity(self.data.len());
        for (key, node) in &self.data {
            data.insert(key.clone(), node.to_json()?);
        }
        let mut object = Map::with_capacity(2);
        object.insert(CLASS_TAG_KEY.to_string(), Json::String(self.class_tag.clone()));
        object.insert(DATA_KEY.to_string(), Json::Object(data));
        Ok(Json::Object(object))
    }

    pub fn from_json(json: Json) -> CodecResult<Self> {
        match json {
            Json::Object(object) if object.contains_key(CLASS_TAG_KEY) => {
                Self::from_tagged_object(object)
            }
            Json::Object(_) => Err(CodecError::InvalidContainer(format!(
                "missing {CLASS_TAG_KEY} field"
            ))),
            other => Err(CodecError::InvalidContainer(format!(
                "expected an object, found {}",
                json_kind(&other)
            ))),
        }
    }

    fn from_tagged_object(mut object: Map<String, Json>) -> CodecResult<Self> {
        let class_tag = match object.remove(CLASS_TAG_KEY) {
            Some(Json::String(tag)) => tag,
            Some(other) => {
                return Err(CodecError::InvalidContainer(format!(
                    "class tag must be a string, found {}",
                    json_kind(&other)
                )))
            }
            None => {
                return Err(CodecError::InvalidContainer(format!(
                    "missing {CLASS_TAG_KEY} field"
                )))
            }
        };

        // A container without a data field decodes to a default instance.
        let data = match object.remove(DATA_KEY) {
            None | Some(Json::Null) => BTreeMap::new(),
            Some(Json::Object(fields)) => fields
                .into_iter()
                .map(|(key, value)| Ok((key, Node::from_json(value)?)))
                .collect::<CodecResult<BTreeMap<_, _>>>()?,
            Some(other) => {
                return Err(CodecError::InvalidContainer(format!(
                    "data of {class_tag} must be an object, found {}",
                    json_kind(&other)
                )))
            }
        };

        Ok(Self { class_tag, data })
    }
}

impl Node {
    pub fn to_json(&self) -> CodecResult<Json> {
        Ok(match self {
            Node::Null => Json::Null,
            Node::Bool(b) => Json::Bool(*b),
            // Nodes carry no location; callers that track one check first.
            Node::Number(n) => Json::Number(Number::from_f64(*n).ok_or_else(|| {
                CodecError::UnsupportedScalar {
                    kind: "non-finite Number".into(),
                    path: String::new(),
                }
            })?),
            Node::String(s) => Json::String(s.clone()),
            Node::Sequence(items) => {
                Json::Array(items.iter().map(Node::to_json).collect::<CodecResult<_>>()?)
            }
            Node::Mapping(fields) => {
                let mut object = Map::with_capacity(fields.len());
                for (key, node) in fields {
                    object.insert(key.clone(), node.to_json()?);
                }
                Json::Object(object)
            }
            Node::Tagged(container) => container.to_json()?,
        })
    }

    pub fn from_json(json: Json) -> CodecResult<Self> {
        Ok(match json {
            Json::Null => Node::Null,
            Json::Bool(b) => Node::Bool(b),
            Json::Number(n) => Node::Number(n.as_f64().ok_or_else(|| {
                CodecError::InvalidContainer(format!("number {n} is not representable"))
            })?),
            Json::String(s) => Node::String(s),
            Json::Array(items) => Node::Sequence(
                items
                    .into_iter()
                    .map(Node::from_json)
                    .collect::<CodecResult<_>>()?,
            ),
            Json::Object(object) if object.contains_key(CLASS_TAG_KEY) => {
                Node::Tagged(Container::from_tagged_object(object)?)
            }
            Json::Object(object) => Node::Mapping(
                object
                    .into_iter()
                    .map(|(key, value)| Ok((key, Node::from_json(value)?)))
                    .collect::<CodecResult<_>>()?,
            ),
        })
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Container {
        let mut inner = Container::new("Inner");
        inner.data.insert("flag".into(), Node::Bool(true));

        let mut outer = Container::new("Outer");
        outer.data.insert("n".into(), Node::Number(1.5));
        outer.data.insert(
            "list".into(),
            Node::Sequence(vec![Node::String("a".into()), Node::Tagged(inner)]),
        );
        outer
    }

    #[test]
    fn encode_produces_tagged_shape() {
        let text = sample().encode().unwrap();
        let json: Json = serde_json::from_str(&text).unwrap();
        assert_eq!(json[CLASS_TAG_KEY], "Outer");
        assert_eq!(json[DATA_KEY]["n"], 1.5);
        assert_eq!(json[DATA_KEY]["list"][1][CLASS_TAG_KEY], "Inner");
        assert_eq!(json[DATA_KEY]["list"][1][DATA_KEY]["flag"], true);
    }

    #[test]
    fn decode_restores_nested_containers() {
        let original = sample();
        let decoded = Container::decode(&original.encode().unwrap()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn plain_objects_stay_mappings() {
        let node = Node::from_json(serde_json::json!({ "a": { "b": [1, null] } })).unwrap();
        match node {
            Node::Mapping(fields) => match &fields["a"] {
                Node::Mapping(inner) => {
                    assert_eq!(inner["b"], Node::Sequence(vec![Node::Number(1.0), Node::Null]));
                }
                other => panic!("expected mapping, got {other:?}"),
            },
            other => panic!("expected mapping, got {other:?}"),
        }
    }

    #[test]
    fn decode_missing_tag_is_invalid() {
        let err = Container::decode(r#"{"data":{}}"#).unwrap_err();
        assert!(matches!(err, CodecError::InvalidContainer(_)));
    }

    #[test]
    fn decode_non_object_is_invalid() {
        let err = Container::decode("[1,2]").unwrap_err();
        assert!(matches!(err, CodecError::InvalidContainer(_)));
    }

    #[test]
    fn decode_non_string_tag_is_invalid() {
        let text = format!(r#"{{"{CLASS_TAG_KEY}":7,"data":{{}}}}"#);
        let err = Container::decode(&text).unwrap_err();
        assert!(matches!(err, CodecError::InvalidContainer(_)));
    }

    #[test]
    fn decode_non_object_data_is_invalid() {
        let text = format!(r#"{{"{CLASS_TAG_KEY}":"A","data":[1]}}"#);
        let err = Container::decode(&text).unwrap_err();
        assert!(matches!(err, CodecError::InvalidContainer(_)));
    }

    #[test]
    fn decode_missing_data_is_empty() {
        let text = format!(r#"{{"{CLASS_TAG_KEY}":"A"}}"#);
        let container = Container::decode(&text).unwrap();
        assert_eq!(container.class_tag, "A");
        assert!(container.data.is_empty());
    }

    #[test]
    fn decode_malformed_json() {
        let err = Container::decode("{not json").unwrap_err();
        assert!(matches!(err, CodecError::Json(_)));
    }

    #[test]
    fn non_finite_numbers_do_not_encode() {
        let mut container = Container::new("A");
        container.data.insert("n".into(), Node::Number(f64::INFINITY));
        let err = container.encode().unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnsupportedScalar { ref kind, ref path }
                if kind == "non-finite Number" && path.is_empty()
        ));
    }
}
