//! The wire form of a [`Mutation`], carried by a reserved form field.
//!
//! An intent travels as the value of the [`INTENT_FIELD`] entry, usually set
//! by the `name`/`value` of a submit button:
//!
//! ```text
//! append/<path>[?<payload>]
//! remove/<path>/<index>
//! replace/<path>/<index>[?<payload>]
//! ```
//!
//! `<payload>` is an urlencoded form whose `value` field holds the element
//! (`value=x`, or `value.content=Buy+milk` for an object). Without a payload
//! the element is an empty scalar; an empty payload (a bare `?`) is an empty
//! object, so appending a blank row for a derived struct round trips. An
//! empty list has no entries and no marker, so it is sent without a payload
//! and arrives as an empty scalar. Field names used in intents must not
//! contain `/` or `?`.

use std::fmt;
use std::str::FromStr;

use url::form_urlencoded;

use crate::entry::to_urlencoded;
use crate::{
    EncodeResult, IntentError, IntentErrorKind, IntentResult, Mutation, Path, Value, decode,
    encode_with_prefix,
};

/// Name of the form field that carries a list mutation.
pub const INTENT_FIELD: &str = "__intent__";

/// Field the payload's element is stored under.
const PAYLOAD_FIELD: &str = "value";

impl Mutation {
    /// Returns the intent string for this mutation.
    ///
    /// Fails if the element has an object key that is not a field name.
    pub fn to_intent(&self) -> EncodeResult<String> {
        let mut out = match self {
            Mutation::Append { path, .. } => format!("append/{path}"),
            Mutation::Remove { path, index } => format!("remove/{path}/{index}"),
            Mutation::Replace { path, index, .. } => format!("replace/{path}/{index}"),
        };
        if let Mutation::Append { value, .. } | Mutation::Replace { value, .. } = self {
            write_payload(&mut out, value)?;
        }
        Ok(out)
    }
}

/// Formats as [`Mutation::to_intent`], failing with [`fmt::Error`] where it
/// fails. Mutations parsed from an intent always format.
impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let intent = self.to_intent().map_err(|_| fmt::Error)?;
        f.write_str(&intent)
    }
}

fn write_payload(out: &mut String, value: &Value) -> EncodeResult<()> {
    if matches!(value, Value::Scalar(s) if s.is_empty()) {
        return Ok(());
    }
    let entries = encode_with_prefix(value, &Path::field(PAYLOAD_FIELD))?;
    if !entries.is_empty() {
        out.push('?');
        out.push_str(&to_urlencoded(&entries));
    } else if let Value::Object(_) = value {
        out.push('?');
    }
    Ok(())
}

impl FromStr for Mutation {
    type Err = IntentError;

    fn from_str(s: &str) -> IntentResult<Self> {
        let (operation, rest) = s.split_once('/').unwrap_or((s, ""));
        let (target, payload) = match rest.split_once('?') {
            Some((target, payload)) => (target, Some(payload)),
            None => (rest, None),
        };

        match operation {
            "append" => {
                if target.contains('/') {
                    return Err(IntentError::new(IntentErrorKind::UnexpectedIndex(
                        operation.to_string(),
                    )));
                }
                Ok(Mutation::Append {
                    path: parse_path(target)?,
                    value: parse_payload(payload)?,
                })
            }
            "remove" => {
                if payload.is_some() {
                    return Err(IntentError::new(IntentErrorKind::UnexpectedValue(
                        operation.to_string(),
                    )));
                }
                let (path, index) = parse_indexed(target)?;
                Ok(Mutation::Remove { path, index })
            }
            "replace" => {
                let (path, index) = parse_indexed(target)?;
                Ok(Mutation::Replace {
                    path,
                    index,
                    value: parse_payload(payload)?,
                })
            }
            other => Err(IntentError::new(IntentErrorKind::UnknownOperation(
                other.to_string(),
            ))),
        }
    }
}

fn parse_path(target: &str) -> IntentResult<Path> {
    if target.is_empty() {
        return Err(IntentError::new(IntentErrorKind::MissingPath));
    }
    Path::parse(target).map_err(|err| IntentError::new(err.into()))
}

fn parse_indexed(target: &str) -> IntentResult<(Path, usize)> {
    let (path, index) = target
        .rsplit_once('/')
        .ok_or_else(|| IntentError::new(IntentErrorKind::MissingIndex))?;
    if index.is_empty() {
        return Err(IntentError::new(IntentErrorKind::MissingIndex));
    }
    let invalid = || IntentError::new(IntentErrorKind::InvalidIndex(index.to_string()));
    if !index.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let index = index.parse().map_err(|_| invalid())?;
    Ok((parse_path(path)?, index))
}

fn parse_payload(payload: Option<&str>) -> IntentResult<Value> {
    let Some(payload) = payload else {
        return Ok(Value::Scalar(String::new()));
    };
    let mut value = decode(form_urlencoded::parse(payload.as_bytes()))
        .map_err(|err| IntentError::new(IntentErrorKind::Payload(err)))?;
    let element = value
        .as_object_mut()
        .and_then(|fields| fields.shift_remove(PAYLOAD_FIELD));
    Ok(element.unwrap_or_else(Value::object))
}
