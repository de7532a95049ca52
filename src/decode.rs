use std::collections::BTreeMap;
use std::mem;

use indexmap::IndexMap;

use crate::entry::Entry;
use crate::path::{Path, Segment};
use crate::{DecodeError, DecodeErrorKind, DecodeResult, Value};

/// Decodes flat form entries into a nested value.
///
/// See [`Decoder`] for the rules.
pub fn decode<I>(entries: I) -> DecodeResult<Value>
where
    I: IntoIterator,
    I::Item: Into<Entry>,
{
    let mut decoder = Decoder::new();
    for entry in entries {
        let entry = entry.into();
        decoder.push(&entry.name, entry.value)?;
    }
    Ok(decoder.finish())
}

/// Partially built value. Lists are keyed by index until [`Decoder::finish`]
/// so that entries may arrive in any order.
#[derive(Debug)]
enum Node {
    /// Freshly created slot, filled before `insert` returns.
    Empty,
    Scalar(String),
    /// A field submitted more than once, such as a multi-select.
    Multi(Vec<String>),
    Object(IndexMap<String, Node>),
    List(BTreeMap<usize, Node>),
}

impl Node {
    fn into_value(self) -> Value {
        match self {
            // Never left behind: conflicts only arise on pre-existing nodes.
            Node::Empty => Value::Scalar(String::new()),
            Node::Scalar(s) => Value::Scalar(s),
            Node::Multi(values) => Value::List(values.into_iter().map(Value::Scalar).collect()),
            Node::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(name, node)| (name, node.into_value()))
                    .collect(),
            ),
            // Ascending index order, with gaps closed.
            Node::List(items) => Value::List(items.into_values().map(Node::into_value).collect()),
        }
    }
}

/// Incremental decoder for flat form entries.
///
/// Each entry's name is parsed as a [`Path`]; missing containers along the
/// path are created as objects (for field segments) or lists (for index
/// segments). A list element's position comes from its index, not from the
/// order entries arrive in, and sparse indices are compacted. Repeating an
/// exact name turns its scalar into a list of scalars, in submission order.
///
/// Using one path both as an object and a list, or as a scalar and a
/// container, fails with [`DecodeErrorKind::Conflict`]. A decoder that has
/// returned an error should be discarded.
#[derive(Debug)]
pub struct Decoder {
    root: Node,
}

impl Decoder {
    pub fn new() -> Self {
        Decoder {
            root: Node::Object(IndexMap::new()),
        }
    }

    /// Adds one entry.
    pub fn push(&mut self, name: &str, value: impl Into<String>) -> DecodeResult<()> {
        let path = Path::parse(name).map_err(|source| {
            DecodeError::new(DecodeErrorKind::MalformedPath {
                name: name.to_string(),
                source,
            })
        })?;
        self.insert(&path, value.into())
    }

    /// Adds one entry whose name has already been parsed.
    pub fn insert(&mut self, path: &Path, value: String) -> DecodeResult<()> {
        tracing::trace!(path = %path, "decoding entry");

        let mut node = &mut self.root;
        for (depth, segment) in path.segments().iter().enumerate() {
            if let Node::Empty = node {
                *node = match segment {
                    Segment::Field(_) => Node::Object(IndexMap::new()),
                    Segment::Index(_) => Node::List(BTreeMap::new()),
                };
            }
            node = match (node, segment) {
                (Node::Object(fields), Segment::Field(name)) => {
                    fields.entry(name.clone()).or_insert(Node::Empty)
                }
                (Node::List(items), Segment::Index(index)) => {
                    items.entry(*index).or_insert(Node::Empty)
                }
                // The root is an object and paths start with a field, so a
                // mismatch is never at depth 0.
                _ => return Err(conflict(path, depth.max(1))),
            };
        }

        match node {
            Node::Empty => *node = Node::Scalar(value),
            Node::Scalar(first) => {
                let first = mem::take(first);
                *node = Node::Multi(vec![first, value]);
            }
            Node::Multi(values) => values.push(value),
            Node::Object(_) | Node::List(_) => return Err(conflict(path, path.len())),
        }
        Ok(())
    }

    /// Returns the decoded value, always an object.
    pub fn finish(self) -> Value {
        self.root.into_value()
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

fn conflict(path: &Path, depth: usize) -> DecodeError {
    let contested = path.prefix(depth).to_string();
    tracing::debug!(path = %path, contested = %contested, "conflicting field paths");
    DecodeError::new(DecodeErrorKind::Conflict { path: contested })
}
