use indexmap::IndexMap;

use crate::path::{Path, Segment};

/// A nested form value.
///
/// Decoding always produces an `Object` at the root. Objects keep their
/// fields in insertion order, and lists are dense: positions run from 0 with
/// no gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A single submitted string.
    Scalar(String),

    /// Named fields, in the order they were first seen.
    Object(IndexMap<String, Value>),

    /// Ordered elements.
    List(Vec<Value>),
}

impl Value {
    /// Returns an empty object.
    pub fn object() -> Self {
        Value::Object(IndexMap::new())
    }

    /// Returns the string if this is a scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut IndexMap<String, Value>> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns a short name for the variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Object(_) => "object",
            Value::List(_) => "list",
        }
    }

    /// Looks up the value at `path` below this one.
    pub fn get(&self, path: &Path) -> Option<&Value> {
        let mut node = self;
        for segment in path.segments() {
            node = match (node, segment) {
                (Value::Object(fields), Segment::Field(name)) => fields.get(name)?,
                (Value::List(items), Segment::Index(index)) => items.get(*index)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Looks up the value at `path` below this one, mutably.
    pub fn get_mut(&mut self, path: &Path) -> Option<&mut Value> {
        let mut node = self;
        for segment in path.segments() {
            node = match (node, segment) {
                (Value::Object(fields), Segment::Field(name)) => fields.get_mut(name)?,
                (Value::List(items), Segment::Index(index)) => items.get_mut(*index)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Returns true if anything was submitted at `path`.
    ///
    /// This is how checkboxes read: a checked box submits an entry, an
    /// unchecked one submits nothing.
    pub fn contains(&self, path: &Path) -> bool {
        self.get(path).is_some()
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::object()
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(items: Vec<V>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(fields: IndexMap<String, Value>) -> Self {
        Value::Object(fields)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Object(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
