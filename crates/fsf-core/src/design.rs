//! Parsed design model
//!
//! A design is a small set of named containers. `fmri` holds the flat
//! key/value namespace; the `*_files` containers are ordered path lists.

use indexmap::IndexMap;
use serde::Serialize;

/// A typed value stored under a design field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    String(String),
    Boolean(bool),
    Integer(i64),
    Float(f64),
}

impl TypedValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            TypedValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of the value.
    ///
    /// Most numbered fields are stored as strings, so string values are
    /// parsed here as well.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TypedValue::Float(v) => Some(*v),
            TypedValue::Integer(i) => Some(*i as f64),
            TypedValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            TypedValue::String(s) => s.trim().parse().ok(),
        }
    }
}

impl std::fmt::Display for TypedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypedValue::String(s) => write!(f, "{}", s),
            TypedValue::Boolean(b) => write!(f, "{}", u8::from(*b)),
            TypedValue::Integer(i) => write!(f, "{}", i),
            TypedValue::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::String(s.to_string())
    }
}

/// Shape of a top-level container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Named fields, kept in file order
    Object,
    /// 1-based positional entries
    Sequence,
}

impl ContainerKind {
    /// Static kind table. `None` for containers the format does not define.
    pub fn lookup(container: &str) -> Option<ContainerKind> {
        match container {
            "fmri" => Some(ContainerKind::Object),
            "feat_files" | "initial_highres_files" | "highres_files" => {
                Some(ContainerKind::Sequence)
            }
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ContainerKind::Object => "object",
            ContainerKind::Sequence => "sequence",
        }
    }
}

/// Contents of one top-level container
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContainerValue {
    Object(IndexMap<String, TypedValue>),
    Sequence(Vec<TypedValue>),
}

impl ContainerValue {
    pub fn new(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::Object => ContainerValue::Object(IndexMap::new()),
            ContainerKind::Sequence => ContainerValue::Sequence(Vec::new()),
        }
    }

    pub fn kind(&self) -> ContainerKind {
        match self {
            ContainerValue::Object(_) => ContainerKind::Object,
            ContainerValue::Sequence(_) => ContainerKind::Sequence,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, TypedValue>> {
        match self {
            ContainerValue::Object(map) => Some(map),
            ContainerValue::Sequence(_) => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[TypedValue]> {
        match self {
            ContainerValue::Sequence(items) => Some(items),
            ContainerValue::Object(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ContainerValue::Object(map) => map.len(),
            ContainerValue::Sequence(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parsed `.fsf` contents: container name to container, in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FlatDesign {
    pub(crate) containers: IndexMap<String, ContainerValue>,
}

impl FlatDesign {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, container: &str) -> Option<&ContainerValue> {
        self.containers.get(container)
    }

    pub fn container_names(&self) -> impl Iterator<Item = &str> {
        self.containers.keys().map(String::as_str)
    }

    /// The `fmri` namespace, if the design set any `fmri` field
    pub fn fmri(&self) -> Option<&IndexMap<String, TypedValue>> {
        self.get("fmri").and_then(ContainerValue::as_object)
    }

    /// Look up a single `fmri` field
    pub fn field(&self, name: &str) -> Option<&TypedValue> {
        self.fmri().and_then(|fmri| fmri.get(name))
    }

    /// Entries of a sequence container as strings; empty if absent
    pub fn files(&self, container: &str) -> Vec<String> {
        self.get(container)
            .and_then(ContainerValue::as_sequence)
            .map(|items| items.iter().map(ToString::to_string).collect())
            .unwrap_or_default()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
