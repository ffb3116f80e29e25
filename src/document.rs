//! Document tree accepted and produced by the annotator.
//!
//! `Node` is a closed variant type over mappings, sequences, and scalars, so
//! traversal is a single match instead of runtime type probing. Mappings keep
//! insertion order. Any serde format whose values are maps, sequences, and
//! scalars (JSON, YAML) deserializes into it; mapping keys must be strings.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Scalar(Scalar),
    List(Vec<Node>),
    Map(IndexMap<String, Node>),
    /// A color scalar after annotation. Never produced by deserialization.
    #[serde(skip_deserializing)]
    Annotated(AnnotatedValue),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// `{value, cct}` record that replaces a color scalar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedValue {
    pub value: String,
    pub cct: f64,
}

impl Node {
    pub fn string(value: impl Into<String>) -> Self {
        Node::Scalar(Scalar::String(value.into()))
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Node>> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_annotated(&self) -> Option<&AnnotatedValue> {
        match self {
            Node::Annotated(annotated) => Some(annotated),
            _ => None,
        }
    }

    /// Look up a child of a mapping
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Scalars at any depth (annotated values count once)
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Scalar(_) | Node::Annotated(_) => 1,
            Node::List(items) => items.iter().map(Node::leaf_count).sum(),
            Node::Map(map) => map.values().map(Node::leaf_count).sum(),
        }
    }
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::String(_) => "string",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Node::Scalar(Scalar::Null),
            Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Node::Scalar(Scalar::Int(i)),
                None => Node::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            Value::String(s) => Node::Scalar(Scalar::String(s)),
            Value::Array(items) => Node::List(items.into_iter().map(Node::from).collect()),
            Value::Object(map) => {
                Node::Map(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
        }
    }
}

impl From<&Node> for serde_json::Value {
    fn from(node: &Node) -> Self {
        use serde_json::{Map, Value, json};
        match node {
            Node::Scalar(Scalar::Null) => Value::Null,
            Node::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
            Node::Scalar(Scalar::Int(i)) => json!(i),
            Node::Scalar(Scalar::Float(x)) => json!(x),
            Node::Scalar(Scalar::String(s)) => Value::String(s.clone()),
            Node::List(items) => Value::Array(items.iter().map(Value::from).collect()),
            Node::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect::<Map<_, _>>(),
            ),
            Node::Annotated(annotated) => json!({
                "value": annotated.value,
                "cct": annotated.cct,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_nested_json() {
        let node: Node = serde_json::from_str(
            r##"{"theme": {"background_color": "#FFFFFF", "sizes": [1, 2.5, null, true]}}"##,
        )
        .unwrap();

        let theme = node.get("theme").expect("theme");
        assert_eq!(theme.get("background_color"), Some(&Node::string("#FFFFFF")));
        let sizes = theme.get("sizes").and_then(Node::as_list).expect("sizes");
        assert_eq!(
            sizes,
            &[
                Node::Scalar(Scalar::Int(1)),
                Node::Scalar(Scalar::Float(2.5)),
                Node::Scalar(Scalar::Null),
                Node::Scalar(Scalar::Bool(true)),
            ]
        );
    }

    #[test]
    fn preserves_key_order() {
        let node: Node = serde_json::from_str(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<_> = node.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn annotated_serializes_as_record() {
        let node = Node::Annotated(AnnotatedValue {
            value: "#FFFFFF".to_string(),
            cct: 6504.12,
        });
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json, json!({"value": "#FFFFFF", "cct": 6504.12}));
        assert_eq!(serde_json::Value::from(&node), json);
    }

    #[test]
    fn annotated_record_reads_back_as_map() {
        let node: Node = serde_json::from_str(r##"{"value": "#FFFFFF", "cct": 6504.12}"##).unwrap();
        assert!(node.as_map().is_some());
        assert!(node.as_annotated().is_none());
    }

    #[test]
    fn json_value_conversion_matches_serde() {
        let value = json!({"a": [1, -2, 3.5, "x", null, false], "b": {"c": "d"}});
        let via_from = Node::from(value.clone());
        let via_serde: Node = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(via_from, via_serde);
        assert_eq!(serde_json::Value::from(&via_from), value);
    }

    #[test]
    fn json_value_conversions_keep_key_order() {
        let node = Node::from(json!({"z_color": "#FFFFFF", "a": 1, "m": [true]}));
        let keys: Vec<_> = node.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z_color", "a", "m"]);

        let back = serde_json::Value::from(&node);
        let keys: Vec<_> = back.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z_color", "a", "m"]);
    }

    #[test]
    fn yaml_documents_are_supported() {
        let node: Node =
            serde_yaml::from_str("title: x\nborder_color: '#000000'\nlist:\n  - 1\n  - ~\n")
                .unwrap();
        assert_eq!(node.get("border_color"), Some(&Node::string("#000000")));
        assert_eq!(node.leaf_count(), 4);
    }
}
