//! Value model
//!
//! A parsed definition document is a tree of [`Value`]s. Every merge rule
//! matches exhaustively on the three shapes instead of probing types at
//! runtime.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Number;

/// Keys are unique; equality and iteration order do not depend on the
/// order keys were written in the source document.
pub type Mapping = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(Scalar),
    Mapping(Mapping),
    Sequence(Vec<Value>),
}

impl Default for Value {
    fn default() -> Self {
        Value::null()
    }
}

impl Value {
    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::Scalar(Scalar::String(s.into()))
    }

    pub fn int(n: i64) -> Self {
        Value::Scalar(Scalar::Number(Number::from(n)))
    }

    pub fn bool(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Scalar(Scalar::Null))
    }

    /// Short shape name used in log events and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Scalar(Scalar::Null) => "null",
            Value::Scalar(Scalar::Bool(_)) => "bool",
            Value::Scalar(Scalar::Number(_)) => "number",
            Value::Scalar(Scalar::String(_)) => "string",
            Value::Mapping(_) => "mapping",
            Value::Sequence(_) => "sequence",
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Text of a scalar, as it would appear unquoted in a document.
    ///
    /// Returns `None` for mappings and sequences.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Value::Scalar(scalar) => Some(scalar.to_string()),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Look up a nested value by a dotted path such as `sections.output`.
    ///
    /// Numeric segments index into sequences.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |current, segment| match current {
                Value::Mapping(map) => map.get(segment),
                Value::Sequence(items) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| items.get(index)),
                Value::Scalar(_) => None,
            })
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<serde_yaml_ng::Value> for Value {
    fn from(value: serde_yaml_ng::Value) -> Self {
        use serde_yaml_ng::Value as Yaml;

        match value {
            Yaml::Null => Value::null(),
            Yaml::Bool(b) => Value::bool(b),
            Yaml::Number(n) => Value::Scalar(yaml_number(&n)),
            Yaml::String(s) => Value::string(s),
            Yaml::Sequence(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            Yaml::Mapping(map) => Value::Mapping(
                map.into_iter()
                    .map(|(key, value)| (yaml_key(key), Value::from(value)))
                    .collect(),
            ),
            Yaml::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match value {
            Json::Null => Value::null(),
            Json::Bool(b) => Value::bool(b),
            Json::Number(n) => Value::Scalar(Scalar::Number(n)),
            Json::String(s) => Value::string(s),
            Json::Array(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => Value::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

fn yaml_number(n: &serde_yaml_ng::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        return Scalar::Number(Number::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Scalar::Number(Number::from(u));
    }
    // NaN and infinities have no JSON number form; keep their YAML spelling.
    match n.as_f64().and_then(Number::from_f64) {
        Some(number) => Scalar::Number(number),
        None => Scalar::String(n.to_string()),
    }
}

fn yaml_key(key: serde_yaml_ng::Value) -> String {
    match Value::from(key) {
        Value::Scalar(scalar) => scalar.to_string(),
        // Complex keys are rare enough that their flow rendering is fine as a name.
        other => serde_json::to_string(&other).unwrap_or_else(|_| other.kind().to_string()),
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Number(n) => n.serialize(serializer),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(scalar) => scalar.serialize(serializer),
            Value::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
            Value::Sequence(items) => {
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    out.serialize_element(item)?;
                }
                out.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        Value::from(serde_yaml_ng::from_str::<serde_yaml_ng::Value>(text).unwrap())
    }

    #[test]
    fn converts_yaml_shapes() {
        let value = yaml(
            r#"
name: Leaf
count: 3
ratio: 0.5
enabled: true
missing: ~
items: [a, b]
"#,
        );

        assert_eq!(value.get("name"), Some(&Value::string("Leaf")));
        assert_eq!(value.get("count"), Some(&Value::int(3)));
        assert_eq!(value.get("enabled"), Some(&Value::bool(true)));
        assert!(value.get("missing").unwrap().is_null());
        assert_eq!(value.get("ratio").unwrap().kind(), "number");
        assert_eq!(
            value.get("items"),
            Some(&Value::Sequence(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn non_string_keys_are_rendered_as_text() {
        let value = yaml("1: one\ntrue: yes\n");
        let map = value.as_mapping().unwrap();
        assert!(map.contains_key("1"));
        assert!(map.contains_key("true"));
    }

    #[test]
    fn mapping_equality_ignores_source_order() {
        assert_eq!(yaml("a: 1\nb: 2\n"), yaml("b: 2\na: 1\n"));
    }

    #[test]
    fn get_path_walks_mappings_and_sequences() {
        let value = yaml(
            r#"
sections:
  output:
    structure:
      - section: a
        value: 1
"#,
        );

        assert_eq!(
            value.get_path("sections.output.structure.0.section"),
            Some(&Value::string("a"))
        );
        assert!(value.get_path("sections.input").is_none());
        assert!(value.get_path("sections.output.structure.7").is_none());
    }

    #[test]
    fn serializes_to_json() {
        let value = yaml("b: [1, true, ~]\na: text\n");
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"a":"text","b":[1,true,null]}"#
        );
    }

    #[test]
    fn json_and_yaml_agree() {
        let from_json = Value::from(serde_json::json!({"name": "X", "n": [1, 2]}));
        assert_eq!(from_json, yaml("name: X\nn: [1, 2]\n"));
    }
}
