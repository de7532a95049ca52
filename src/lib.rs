//! Formwire converts browser form submissions, a flat ordered list of
//! `(name, value)` pairs, into nested values and back.
//!
//! Field names carry the structure: `todo[0].content` is the `content` field
//! of the first element of the `todo` list. Repeating a name (a multi-select)
//! yields a list of its values, and a checkbox is true when its entry is
//! present at all.
//!
//! Lists can also be edited without client-side scripting: a submit button
//! named [`INTENT_FIELD`] carries a [`Mutation`] that is applied to the
//! submitted value before the form is rendered again.
//!
//! # Examples
//!
//! ```
//! use formwire::{Value, decode, encode, Entry};
//!
//! let value = decode([
//!     ("todo[0].content", "Buy milk"),
//!     ("todo[0].complete", "on"),
//!     ("todo[1].content", "Buy eggs"),
//! ])
//! .unwrap();
//!
//! assert_eq!(
//!     value,
//!     Value::from_iter([(
//!         "todo",
//!         vec![
//!             Value::from_iter([("content", "Buy milk"), ("complete", "on")]),
//!             Value::from_iter([("content", "Buy eggs")]),
//!         ],
//!     )])
//! );
//! assert_eq!(encode(&value).unwrap()[2], Entry::new("todo[1].content", "Buy eggs"));
//! ```

mod decode;
mod encode;
mod entry;
mod error;
mod field_errors;
mod intent;
mod mutation;
mod path;
mod submission;
mod traits;
mod value;

pub use crate::decode::{Decoder, decode};
pub use crate::encode::{Encoder, encode, encode_to_urlencoded, encode_with_prefix};
pub use crate::entry::{Entry, parse_urlencoded, to_urlencoded};
pub use crate::error::{
    DecodeError, DecodeErrorKind, DecodeResult, EncodeError, EncodeErrorKind, EncodeResult,
    FieldErrorKind, IntentError, IntentErrorKind, IntentResult, MutationError, MutationErrorKind,
    MutationResult, PathError, PathErrorKind, PathResult, SubmissionError, SubmissionErrorKind,
    SubmissionResult,
};
pub use crate::field_errors::FieldErrors;
pub use crate::intent::INTENT_FIELD;
pub use crate::mutation::Mutation;
pub use crate::path::{MAX_PATH_DEPTH, Path, Segment};
pub use crate::submission::{FormState, Submission};
pub use crate::traits::{FormValue, from_value, to_value};
pub use crate::value::Value;

#[doc(hidden)]
pub use crate::traits::{StructReader, StructWriter};

/// Re-export of the derive macro for implementing [`FormValue`] on structs.
///
/// # Example
///
/// ```
/// use formwire::{Form, Value, from_value};
///
/// #[derive(Debug, PartialEq, Form)]
/// struct Todo {
///     content: String,
///     complete: bool,
///     #[form(rename = "due-date")]
///     due: Option<String>,
/// }
///
/// let value = Value::from_iter([("content", "Buy milk"), ("due-date", "")]);
/// let todo: Todo = from_value(&value).unwrap();
/// assert_eq!(
///     todo,
///     Todo {
///         content: "Buy milk".to_string(),
///         complete: false,
///         due: None,
///     }
/// );
/// ```
pub use formwire_derive::Form;
