//! Tagged variable values
//!
//! YAML is decoded once, at the parse boundary, into [`Value`]. Everything
//! past that point matches on `Scalar | Mapping | Sequence` instead of
//! probing a loosely typed tree.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Variables keyed by name.
///
/// Keys are kept sorted so that iteration, and therefore every registry
/// write derived from a map, is reproducible run to run.
pub type VariableMap = BTreeMap<String, Value>;

/// A variable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(Scalar),
    Mapping(VariableMap),
    Sequence(Vec<Value>),
}

/// A leaf value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(serde_yaml::Number),
    String(String),
}

/// A mapping key that is itself a mapping or a sequence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct NonScalarKey(pub String);

impl Value {
    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    pub fn as_mapping(&self) -> Option<&VariableMap> {
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

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Scalar(Scalar::Number(n)) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Scalar(Scalar::Null))
    }

    /// Short name of the value kind, for messages.
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
}

impl TryFrom<serde_yaml::Value> for Value {
    type Error = NonScalarKey;

    fn try_from(value: serde_yaml::Value) -> Result<Self, Self::Error> {
        Ok(match value {
            serde_yaml::Value::Null => Value::Scalar(Scalar::Null),
            serde_yaml::Value::Bool(b) => Value::Scalar(Scalar::Bool(b)),
            serde_yaml::Value::Number(n) => Value::Scalar(Scalar::Number(n)),
            serde_yaml::Value::String(s) => Value::Scalar(Scalar::String(s)),
            serde_yaml::Value::Sequence(items) => Value::Sequence(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            serde_yaml::Value::Mapping(mapping) => Value::Mapping(mapping_from_yaml(mapping)?),
            // Custom tags carry no meaning for resolution
            serde_yaml::Value::Tagged(tagged) => Value::try_from(tagged.value)?,
        })
    }
}

/// Convert a YAML mapping into a [`VariableMap`].
///
/// Scalar keys are stringified the way YAML prints them (`80`, `true`,
/// `null`); a mapping or sequence used as a key is rejected.
pub fn mapping_from_yaml(mapping: serde_yaml::Mapping) -> Result<VariableMap, NonScalarKey> {
    mapping
        .into_iter()
        .map(|(key, value)| Ok((key_to_string(key)?, Value::try_from(value)?)))
        .collect()
}

/// Stringify a YAML mapping key.
pub fn key_to_string(key: serde_yaml::Value) -> Result<String, NonScalarKey> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        serde_yaml::Value::Tagged(tagged) => key_to_string(tagged.value),
        other => Err(NonScalarKey(
            serde_yaml::to_string(&other)
                .map(|text| text.trim().replace('\n', " "))
                .unwrap_or_else(|_| "<complex key>".to_string()),
        )),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(Scalar::Null) => write!(f, "null"),
            Value::Scalar(Scalar::Bool(b)) => write!(f, "{b}"),
            Value::Scalar(Scalar::Number(n)) => write!(f, "{n}"),
            Value::Scalar(Scalar::String(s)) => write!(f, "{s}"),
            other => match serde_json::to_string(other) {
                Ok(json) => write!(f, "{json}"),
                Err(_) => Err(fmt::Error),
            },
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::String(s))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Scalar(Scalar::Number(n.into()))
    }
}

impl From<VariableMap> for Value {
    fn from(map: VariableMap) -> Self {
        Value::Mapping(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}
