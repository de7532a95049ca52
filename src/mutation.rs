use std::mem;

use indexmap::IndexMap;

use crate::path::{Path, Segment};
use crate::{MutationError, MutationErrorKind, MutationResult, Value};

/// A request to edit a list inside a form value.
///
/// This is what a list button in a form submits: a plain record that can be
/// logged, sent over the wire as an intent (see
/// [`INTENT_FIELD`](crate::INTENT_FIELD)), and replayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Push `value` onto the end of the list at `path`.
    Append { path: Path, value: Value },
    /// Delete the element at `index`, shifting later elements down.
    Remove { path: Path, index: usize },
    /// Overwrite the element at `index`.
    Replace {
        path: Path,
        index: usize,
        value: Value,
    },
}

impl Mutation {
    /// Returns the path of the list this mutation targets.
    pub fn path(&self) -> &Path {
        match self {
            Mutation::Append { path, .. }
            | Mutation::Remove { path, .. }
            | Mutation::Replace { path, .. } => path,
        }
    }

    /// Returns the name of the operation.
    pub fn operation(&self) -> &'static str {
        match self {
            Mutation::Append { .. } => "append",
            Mutation::Remove { .. } => "remove",
            Mutation::Replace { .. } => "replace",
        }
    }

    /// Applies this mutation to `target`. On error `target` is unchanged.
    pub fn apply(&self, target: &mut Value) -> MutationResult<()> {
        let result = match self {
            Mutation::Append { path, value } => target.append(path, value.clone()),
            Mutation::Remove { path, index } => target.remove(path, *index).map(|_| ()),
            Mutation::Replace { path, index, value } => {
                target.replace(path, *index, value.clone()).map(|_| ())
            }
        };
        match &result {
            Ok(()) => tracing::debug!(
                operation = self.operation(),
                path = %self.path(),
                "applied list mutation"
            ),
            Err(err) => tracing::debug!(
                operation = self.operation(),
                path = %self.path(),
                error = %err,
                "list mutation rejected"
            ),
        }
        result
    }
}

impl Value {
    /// Pushes `item` onto the list at `path`.
    ///
    /// A missing list is created, along with any missing objects above it. A
    /// scalar at `path` becomes the first element of a new list, the same way
    /// a repeated field decodes. Fails only when `path` runs through a scalar
    /// or a mismatched container, or ends at an object.
    pub fn append(&mut self, path: &Path, item: Value) -> MutationResult<()> {
        check_append(self, path)?;

        let slot = append_slot(self, path)?;
        match slot {
            Value::List(items) => items.push(item),
            Value::Scalar(first) => {
                let first = Value::Scalar(mem::take(first));
                *slot = Value::List(vec![first, item]);
            }
            Value::Object(_) => return Err(conflict(path, path.len())),
        }
        Ok(())
    }

    /// Removes and returns the element at `index` of the list at `path`.
    pub fn remove(&mut self, path: &Path, index: usize) -> MutationResult<Value> {
        let items = list_mut(self, path)?;
        check_index(path, index, items.len())?;
        Ok(items.remove(index))
    }

    /// Replaces the element at `index` of the list at `path`, returning the
    /// old element.
    pub fn replace(&mut self, path: &Path, index: usize, item: Value) -> MutationResult<Value> {
        let items = list_mut(self, path)?;
        check_index(path, index, items.len())?;
        Ok(mem::replace(&mut items[index], item))
    }
}

/// Checks, without modifying anything, that `append_slot` will succeed.
fn check_append(root: &Value, path: &Path) -> MutationResult<()> {
    let segments = path.segments();
    let mut node = root;
    for (depth, segment) in segments.iter().enumerate() {
        let child = match (node, segment) {
            (Value::Object(fields), Segment::Field(name)) => fields.get(name),
            (Value::List(items), Segment::Index(index)) => match items.get(*index) {
                Some(item) => Some(item),
                None => return Err(out_of_range(path, depth, *index, items.len())),
            },
            _ => return Err(conflict(path, depth)),
        };
        let Some(child) = child else {
            // Missing fields become objects; missing list elements are not
            // invented.
            return match segments[depth + 1..]
                .iter()
                .position(|s| matches!(s, Segment::Index(_)))
            {
                Some(offset) => Err(not_found(path, depth + 1 + offset)),
                None => Ok(()),
            };
        };
        node = child;
    }
    match node {
        Value::Object(_) => Err(conflict(path, path.len())),
        Value::Scalar(_) | Value::List(_) => Ok(()),
    }
}

/// Walks to `path`, creating missing objects and a missing final list.
fn append_slot<'a>(root: &'a mut Value, path: &Path) -> MutationResult<&'a mut Value> {
    let last = path.len() - 1;
    let mut node = root;
    for (depth, segment) in path.segments().iter().enumerate() {
        node = match (node, segment) {
            (Value::Object(fields), Segment::Field(name)) => {
                fields.entry(name.clone()).or_insert_with(|| {
                    if depth == last {
                        Value::List(Vec::new())
                    } else {
                        Value::Object(IndexMap::new())
                    }
                })
            }
            (Value::List(items), Segment::Index(index)) => {
                let len = items.len();
                items
                    .get_mut(*index)
                    .ok_or_else(|| out_of_range(path, depth, *index, len))?
            }
            _ => return Err(conflict(path, depth)),
        };
    }
    Ok(node)
}

/// Walks to the existing list at `path` without creating anything.
fn list_mut<'a>(root: &'a mut Value, path: &Path) -> MutationResult<&'a mut Vec<Value>> {
    let mut node = root;
    for (depth, segment) in path.segments().iter().enumerate() {
        let child = match (node, segment) {
            (Value::Object(fields), Segment::Field(name)) => fields.get_mut(name),
            (Value::List(items), Segment::Index(index)) => items.get_mut(*index),
            _ => return Err(conflict(path, depth)),
        };
        node = child.ok_or_else(|| not_found(path, depth + 1))?;
    }
    match node {
        Value::List(items) => Ok(items),
        _ => Err(conflict(path, path.len())),
    }
}

fn check_index(path: &Path, index: usize, len: usize) -> MutationResult<()> {
    if index >= len {
        return Err(out_of_range(path, path.len(), index, len));
    }
    Ok(())
}

/// The path of the node at `depth`, where depth 0 is the root itself.
fn name_at(path: &Path, depth: usize) -> String {
    path.prefix(depth.max(1)).to_string()
}

fn conflict(path: &Path, depth: usize) -> MutationError {
    MutationError::new(MutationErrorKind::Conflict {
        path: name_at(path, depth),
    })
}

fn not_found(path: &Path, depth: usize) -> MutationError {
    MutationError::new(MutationErrorKind::NotFound {
        path: name_at(path, depth),
    })
}

fn out_of_range(path: &Path, depth: usize, index: usize, len: usize) -> MutationError {
    MutationError::new(MutationErrorKind::IndexOutOfRange {
        path: name_at(path, depth),
        index,
        len,
    })
}

#[cfg(test)]
mod tests {
    use super::Mutation;
    use crate::{Entry, MutationError, MutationErrorKind, Path, Value, encode};

    fn path(name: &str) -> Path {
        Path::parse(name).unwrap()
    }

    fn abc() -> Value {
        Value::from_iter([("items", vec!["a", "b", "c"])])
    }

    #[test]
    fn test_remove_closes_gap() {
        let mut value = abc();
        let removed = value.remove(&path("items"), 1).unwrap();
        assert_eq!(removed, Value::from("b"));
        assert_eq!(value, Value::from_iter([("items", vec!["a", "c"])]));
        assert_eq!(
            encode(&value).unwrap(),
            vec![Entry::new("items[0]", "a"), Entry::new("items[1]", "c")]
        );
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut value = Value::from_iter([("items", vec!["a", "b"])]);
        assert_eq!(
            value.remove(&path("items"), 5),
            Err(MutationError::new(MutationErrorKind::IndexOutOfRange {
                path: "items".to_string(),
                index: 5,
                len: 2,
            }))
        );
        assert_eq!(value, Value::from_iter([("items", vec!["a", "b"])]));
    }

    #[test]
    fn test_append_then_encode() {
        let mut value = Value::from_iter([("items", Value::List(vec![]))]);
        value.append(&path("items"), Value::from("")).unwrap();
        assert_eq!(encode(&value).unwrap(), vec![Entry::new("items[0]", "")]);
    }

    #[test]
    fn test_append_creates_list_and_parents() {
        let mut value = Value::object();
        value
            .append(&path("project.todo"), Value::from_iter([("content", "")]))
            .unwrap();
        assert_eq!(
            value,
            Value::from_iter([(
                "project",
                Value::from_iter([("todo", vec![Value::from_iter([("content", "")])])]),
            )])
        );
    }

    #[test]
    fn test_append_into_nested_list() {
        let mut value = Value::from_iter([(
            "todo",
            vec![Value::from_iter([("tags", vec!["home"])])],
        )]);
        value.append(&path("todo[0].tags"), Value::from("urgent")).unwrap();
        assert_eq!(
            value.get(&path("todo[0].tags")),
            Some(&Value::from(vec!["home", "urgent"]))
        );
    }

    #[test]
    fn test_append_promotes_scalar() {
        let mut value = Value::from_iter([("tag", "red")]);
        value.append(&path("tag"), Value::from("blue")).unwrap();
        assert_eq!(value, Value::from_iter([("tag", vec!["red", "blue"])]));
    }

    #[test]
    fn test_append_failures_leave_value_unchanged() {
        let original = Value::from_iter([
            ("name", Value::from("x")),
            ("todo", Value::from(vec![Value::from_iter([("content", "a")])])),
        ]);
        let cases = [
            (
                "name.list",
                MutationErrorKind::Conflict {
                    path: "name".to_string(),
                },
            ),
            (
                "todo[0]",
                MutationErrorKind::Conflict {
                    path: "todo[0]".to_string(),
                },
            ),
            (
                "todo[4].tags",
                MutationErrorKind::IndexOutOfRange {
                    path: "todo".to_string(),
                    index: 4,
                    len: 1,
                },
            ),
            (
                "fresh.rows[0].cells",
                MutationErrorKind::NotFound {
                    path: "fresh.rows".to_string(),
                },
            ),
        ];
        for (name, kind) in cases {
            let mut value = original.clone();
            assert_eq!(
                value.append(&path(name), Value::from("")),
                Err(MutationError::new(kind)),
                "{name}"
            );
            assert_eq!(value, original, "{name}");
        }
    }

    #[test]
    fn test_replace() {
        let mut value = abc();
        let old = value.replace(&path("items"), 2, Value::from("z")).unwrap();
        assert_eq!(old, Value::from("c"));
        assert_eq!(value, Value::from_iter([("items", vec!["a", "b", "z"])]));

        assert_eq!(
            value.replace(&path("items"), 3, Value::from("q")),
            Err(MutationError::new(MutationErrorKind::IndexOutOfRange {
                path: "items".to_string(),
                index: 3,
                len: 3,
            }))
        );
    }

    #[test]
    fn test_remove_missing_or_wrong_kind() {
        let mut value = Value::from_iter([("name", "x")]);
        assert_eq!(
            value.remove(&path("todo"), 0),
            Err(MutationError::new(MutationErrorKind::NotFound {
                path: "todo".to_string(),
            }))
        );
        assert_eq!(
            value.remove(&path("name"), 0),
            Err(MutationError::new(MutationErrorKind::Conflict {
                path: "name".to_string(),
            }))
        );
    }

    #[test]
    fn test_mutation_apply() {
        let mut value = abc();
        let mutations = [
            Mutation::Append {
                path: path("items"),
                value: Value::from("d"),
            },
            Mutation::Remove {
                path: path("items"),
                index: 0,
            },
            Mutation::Replace {
                path: path("items"),
                index: 0,
                value: Value::from("B"),
            },
        ];
        for mutation in &mutations {
            mutation.apply(&mut value).unwrap();
        }
        assert_eq!(value, Value::from_iter([("items", vec!["B", "c", "d"])]));
        assert_eq!(mutations[1].operation(), "remove");
        assert_eq!(mutations[2].path(), &path("items"));
    }
}
