use std::fmt::Write;

use crate::entry::{Entry, to_urlencoded};
use crate::path::{Segment, is_field_name};
use crate::{EncodeError, EncodeErrorKind, EncodeResult, Path, Value};

/// Encodes a value as flat form entries.
///
/// Object fields become `parent.field`, list elements `parent[i]`. Empty
/// objects and lists produce no entries, so they decode as absent. An object
/// key that is empty or contains `.`, `[` or `]` would name a different field
/// and fails with [`EncodeErrorKind::InvalidFieldName`].
pub fn encode(value: &Value) -> EncodeResult<Vec<Entry>> {
    let mut encoder = Encoder::new();
    encoder.write(None, value)?;
    Ok(encoder.finish())
}

/// Encodes a value as flat form entries named below `prefix`.
pub fn encode_with_prefix(value: &Value, prefix: &Path) -> EncodeResult<Vec<Entry>> {
    let mut encoder = Encoder::new();
    encoder.write(Some(prefix), value)?;
    Ok(encoder.finish())
}

/// Encodes a value as an `application/x-www-form-urlencoded` string.
pub fn encode_to_urlencoded(value: &Value) -> EncodeResult<String> {
    Ok(to_urlencoded(&encode(value)?))
}

/// Accumulates entries from one or more values.
#[derive(Debug, Default)]
pub struct Encoder {
    entries: Vec<Entry>,
    name: String,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the entries for `value`, named below `prefix`.
    ///
    /// Without a prefix the value should be an object: a bare scalar or list
    /// at the root has no name and is skipped. On error nothing from this
    /// call is kept.
    pub fn write(&mut self, prefix: Option<&Path>, value: &Value) -> EncodeResult<()> {
        self.name.clear();
        if let Some(prefix) = prefix {
            for segment in prefix.segments() {
                if let Segment::Field(name) = segment
                    && !is_field_name(name)
                {
                    return Err(self.invalid_field_name(name));
                }
            }
            // Writing to a String cannot fail.
            let _ = write!(self.name, "{prefix}");
        }

        let written = self.entries.len();
        let result = self.write_value(value);
        if result.is_err() {
            self.entries.truncate(written);
        }
        result
    }

    pub fn finish(self) -> Vec<Entry> {
        self.entries
    }

    fn write_value(&mut self, value: &Value) -> EncodeResult<()> {
        let len = self.name.len();
        match value {
            Value::Scalar(s) => {
                if len > 0 {
                    self.entries.push(Entry::new(self.name.clone(), s.clone()));
                }
            }
            Value::Object(fields) => {
                for (field, child) in fields {
                    if !is_field_name(field) {
                        return Err(self.invalid_field_name(field));
                    }
                    if len > 0 {
                        self.name.push('.');
                    }
                    self.name.push_str(field);
                    self.write_value(child)?;
                    self.name.truncate(len);
                }
            }
            Value::List(items) => {
                if len == 0 {
                    return Ok(());
                }
                for (index, child) in items.iter().enumerate() {
                    let _ = write!(self.name, "[{index}]");
                    self.write_value(child)?;
                    self.name.truncate(len);
                }
            }
        }
        Ok(())
    }

    fn invalid_field_name(&self, name: &str) -> EncodeError {
        EncodeError::new(EncodeErrorKind::InvalidFieldName {
            parent: self.name.clone(),
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Encoder, encode, encode_to_urlencoded, encode_with_prefix};
    use crate::{EncodeError, EncodeErrorKind, Entry, Path, Value, decode};

    fn todo() -> Value {
        Value::from_iter([
            ("title", Value::from("Groceries")),
            (
                "todo",
                Value::from(vec![
                    Value::from_iter([("content", "Buy milk"), ("complete", "on")]),
                    Value::from_iter([("content", "Buy eggs")]),
                ]),
            ),
            ("tag", Value::from(vec!["red", "blue"])),
        ])
    }

    #[test]
    fn test_encode() {
        assert_eq!(
            encode(&todo()).unwrap(),
            vec![
                Entry::new("title", "Groceries"),
                Entry::new("todo[0].content", "Buy milk"),
                Entry::new("todo[0].complete", "on"),
                Entry::new("todo[1].content", "Buy eggs"),
                Entry::new("tag[0]", "red"),
                Entry::new("tag[1]", "blue"),
            ]
        );
    }

    #[test]
    fn test_roundtrip() {
        let value = todo();
        assert_eq!(decode(encode(&value).unwrap()).unwrap(), value);

        let nested = Value::from_iter([(
            "grid",
            vec![
                Value::from(vec![Value::from_iter([("x", "1")])]),
                Value::from(vec!["a", "b"]),
            ],
        )]);
        assert_eq!(decode(encode(&nested).unwrap()).unwrap(), nested);
    }

    #[test]
    fn test_empty_branches_emit_nothing() {
        let value = Value::from_iter([
            ("items", Value::List(vec![])),
            ("meta", Value::object()),
            ("name", Value::from("")),
        ]);
        assert_eq!(encode(&value).unwrap(), vec![Entry::new("name", "")]);
    }

    #[test]
    fn test_prefix() {
        let prefix = Path::parse("form.todo[3]").unwrap();
        let value = Value::from_iter([("content", "Buy milk")]);
        assert_eq!(
            encode_with_prefix(&value, &prefix).unwrap(),
            vec![Entry::new("form.todo[3].content", "Buy milk")]
        );
        assert_eq!(
            encode_with_prefix(&Value::from("x"), &Path::field("name")).unwrap(),
            vec![Entry::new("name", "x")]
        );
        assert_eq!(
            encode_with_prefix(&Value::from(vec!["x"]), &Path::field("tags")).unwrap(),
            vec![Entry::new("tags[0]", "x")]
        );
    }

    #[test]
    fn test_unnamed_root_is_skipped() {
        assert!(encode(&Value::from("x")).unwrap().is_empty());
        assert!(encode(&Value::from(vec!["x"])).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_keys_are_rejected() {
        let cases = [
            (
                Value::from_iter([("", Value::from_iter([("b", "x")]))]),
                "",
                "",
            ),
            (Value::from_iter([("a.b", "y")]), "", "a.b"),
            (
                Value::from_iter([("todo", vec![Value::from_iter([("x[0]", "y")])])]),
                "todo[0]",
                "x[0]",
            ),
        ];
        for (value, parent, name) in cases {
            assert_eq!(
                encode(&value),
                Err(EncodeError::new(EncodeErrorKind::InvalidFieldName {
                    parent: parent.to_string(),
                    name: name.to_string(),
                })),
                "{value:?}"
            );
        }

        assert!(encode_with_prefix(&Value::from("x"), &Path::field("a]")).is_err());
    }

    #[test]
    fn test_failed_write_keeps_nothing() {
        let mut encoder = Encoder::new();
        encoder.write(Some(&Path::field("a")), &Value::from("1")).unwrap();
        let bad = Value::from_iter([("ok", Value::from("2")), ("no.pe", Value::from("3"))]);
        assert!(encoder.write(None, &bad).is_err());
        assert_eq!(encoder.finish(), vec![Entry::new("a", "1")]);
    }

    #[test]
    fn test_encoder_reuse() {
        let mut encoder = Encoder::new();
        encoder.write(Some(&Path::field("a")), &Value::from("1")).unwrap();
        encoder.write(None, &Value::from_iter([("b", "2")])).unwrap();
        assert_eq!(
            encoder.finish(),
            vec![Entry::new("a", "1"), Entry::new("b", "2")]
        );
    }

    #[test]
    fn test_urlencoded() {
        let value = Value::from_iter([("todo", vec![Value::from_iter([("content", "a b")])])]);
        assert_eq!(
            encode_to_urlencoded(&value).unwrap(),
            "todo%5B0%5D.content=a+b"
        );
    }
}
