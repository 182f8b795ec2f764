//! # Document Values
//!
//! [`Value`] is the tree every document and schema definition is converted
//! into before rty touches it, and the tree every validation produces.
//!
//! It is a superset of the YAML data model: besides scalars, sequences and
//! mappings it has [`Value::Tuple`] (fixed-arity sequences produced by tuple
//! fields) and [`Value::Object`] (instances produced by object fields through
//! an external constructor). Both serialize back into plain YAML/JSON in a
//! form that re-validates against the same schema:
//!
//! - tuples become their literal text, e.g. `"(1, 'a')"`;
//! - instances become a mapping whose first key is [`TYPE_SENTINEL`]
//!   followed by the constructor arguments.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Reserved mapping key naming the target type of a dynamic object field.
pub const TYPE_SENTINEL: &str = "_type_";

/// Order-preserving string-keyed mapping.
pub type Mapping = IndexMap<String, Value>;

/// A document value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Map(Mapping),
    Object(Instance),
}

impl Value {
    /// Short name of the value's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Map(_) => "mapping",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Elements of a list or tuple.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Convert a parsed YAML value.
    ///
    /// Tags are dropped (the tagged value is converted). Integers that do
    /// not fit `i64` become floats. Mapping keys must be strings, numbers or
    /// booleans; numbers and booleans are stringified.
    pub fn from_yaml(yaml: &serde_yaml::Value) -> Result<Value, String> {
        match yaml {
            serde_yaml::Value::Null => Ok(Value::Null),
            serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Float(f))
                } else {
                    Err(format!("unsupported YAML number: {n:?}"))
                }
            }
            serde_yaml::Value::String(s) => Ok(Value::Str(s.clone())),
            serde_yaml::Value::Sequence(seq) => {
                let items: Result<Vec<Value>, String> = seq.iter().map(Value::from_yaml).collect();
                Ok(Value::List(items?))
            }
            serde_yaml::Value::Mapping(map) => {
                let mut out = Mapping::with_capacity(map.len());
                for (k, v) in map {
                    let key = match k {
                        serde_yaml::Value::String(s) => s.clone(),
                        serde_yaml::Value::Number(n) => n.to_string(),
                        serde_yaml::Value::Bool(b) => b.to_string(),
                        other => return Err(format!("unsupported YAML map key type: {other:?}")),
                    };
                    out.insert(key, Value::from_yaml(v)?);
                }
                Ok(Value::Map(out))
            }
            serde_yaml::Value::Tagged(tagged) => Value::from_yaml(&tagged.value),
        }
    }

    /// Convert a parsed JSON value.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => Value::List(items.iter().map(Value::from_json).collect()),
            serde_json::Value::Object(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Textual form of a value nested inside a sequence: strings are
    /// single-quoted so the result reads back as the same literal, and
    /// instances are written as a mapping led by [`TYPE_SENTINEL`].
    pub fn literal(&self) -> String {
        match self {
            Value::Str(s) => quote(s),
            Value::Object(inst) => {
                let mut map = Mapping::with_capacity(inst.args.len() + 1);
                map.insert(TYPE_SENTINEL.to_string(), Value::Str(inst.type_path.clone()));
                map.extend(inst.args.iter().map(|(k, v)| (k.clone(), v.clone())));
                Value::Map(map).to_string()
            }
            other => other.to_string(),
        }
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

fn fmt_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{f:.1}")
    } else {
        format!("{f}")
    }
}

fn join_literals(items: &[Value]) -> String {
    items.iter().map(Value::literal).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{}", fmt_float(*x)),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(items) => write!(f, "[{}]", join_literals(items)),
            Value::Tuple(items) if items.len() == 1 => write!(f, "({},)", items[0].literal()),
            Value::Tuple(items) => write!(f, "({})", join_literals(items)),
            Value::Map(map) => {
                let body: Vec<String> = map
                    .iter()
                    .map(|(k, v)| format!("{}: {}", quote(k), v.literal()))
                    .collect();
                write!(f, "{{{}}}", body.join(", "))
            }
            Value::Object(inst) => write!(f, "{inst}"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Str(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Tuple(_) => serializer.serialize_str(&self.to_string()),
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Object(inst) => {
                let mut map = serializer.serialize_map(Some(inst.args.len() + 1))?;
                map.serialize_entry(TYPE_SENTINEL, &inst.type_path)?;
                for (k, v) in &inst.args {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Map(map)
    }
}

/// An object built by an external constructor.
///
/// Keeps the arguments it was constructed from so it can be compared,
/// displayed, and serialized back into a mapping. The constructed payload is
/// type-erased; use [`downcast_ref`](Self::downcast_ref) to get it back.
#[derive(Clone)]
pub struct Instance {
    type_path: String,
    args: Mapping,
    payload: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    pub fn new<T: Any + Send + Sync>(type_path: impl Into<String>, args: Mapping, payload: T) -> Self {
        Self::from_shared(type_path, args, Arc::new(payload))
    }

    pub fn from_shared(
        type_path: impl Into<String>,
        args: Mapping,
        payload: Arc<dyn Any + Send + Sync>,
    ) -> Self {
        Self {
            type_path: type_path.into(),
            args,
            payload,
        }
    }

    /// Fully-qualified name of the constructed type.
    pub fn type_path(&self) -> &str {
        &self.type_path
    }

    /// Arguments passed to the constructor, after validation and defaulting.
    pub fn args(&self) -> &Mapping {
        &self.args
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.type_path == other.type_path && self.args == other.args
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_path", &self.type_path)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self
            .args
            .iter()
            .map(|(k, v)| format!("{k}={}", v.literal()))
            .collect();
        write!(f, "{}({})", self.type_path, args.join(", "))
    }
}
