use thiserror::Error;

/// Specific kinds of errors that can occur when parsing a field name into a
/// path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathErrorKind {
    #[error("empty field name")]
    Empty,

    #[error("empty segment")]
    EmptySegment,

    #[error("field name must start with an identifier, not an index")]
    LeadingIndex,

    #[error("'.' must be followed by an identifier, got '['")]
    DotBeforeBracket,

    #[error("unclosed '['")]
    UnclosedBracket,

    #[error("unmatched ']'")]
    UnmatchedBracket,

    #[error("invalid index {0:?} (expected a non-negative integer)")]
    InvalidIndex(String),

    #[error("unexpected character {0:?} after ']'")]
    UnexpectedCharacter(char),

    #[error("more than {max} segments")]
    TooDeep { max: usize },
}

/// Error type returned when a field name is not a well-formed path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed path at byte {position}: {kind}")]
pub struct PathError {
    kind: PathErrorKind,
    position: usize,
}

impl PathError {
    /// Creates a new PathError with the given kind at the given byte offset.
    pub const fn new(kind: PathErrorKind, position: usize) -> Self {
        Self { kind, position }
    }

    /// Returns the specific kind of path error that occurred.
    pub fn kind(&self) -> &PathErrorKind {
        &self.kind
    }

    /// Returns the byte offset in the field name where parsing failed.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Result type for path parsing.
pub type PathResult<T> = Result<T, PathError>;

/// Specific kinds of errors that can occur when decoding flat entries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    #[error("field name {name:?} is malformed: {source}")]
    MalformedPath { name: String, source: PathError },

    #[error("conflicting use of {path:?} as more than one of scalar, object and list")]
    Conflict { path: String },
}

/// Error type returned when flat entries cannot be decoded into a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("decode error: {kind}")]
pub struct DecodeError {
    kind: DecodeErrorKind,
}

impl DecodeError {
    /// Creates a new DecodeError with the given kind.
    pub const fn new(kind: DecodeErrorKind) -> Self {
        Self { kind }
    }

    /// Returns the specific kind of decode error that occurred.
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }
}

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Specific kinds of errors that can occur when encoding a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeErrorKind {
    #[error("object key {name:?} under {parent:?} is not a field name")]
    InvalidFieldName { parent: String, name: String },
}

/// Error type returned when a value cannot be written as flat entries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("encode error: {kind}")]
pub struct EncodeError {
    kind: EncodeErrorKind,
}

impl EncodeError {
    /// Creates a new EncodeError with the given kind.
    pub const fn new(kind: EncodeErrorKind) -> Self {
        Self { kind }
    }

    /// Returns the specific kind of encode error that occurred.
    pub fn kind(&self) -> &EncodeErrorKind {
        &self.kind
    }
}

/// Result type for encoding operations.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Specific kinds of errors that can occur when mutating a list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationErrorKind {
    #[error("index {index} out of range for list {path:?} of length {len}")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("no list at {path:?}")]
    NotFound { path: String },

    #[error("{path:?} is not a list")]
    Conflict { path: String },
}

/// Error type returned when a list mutation cannot be applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("mutation error: {kind}")]
pub struct MutationError {
    kind: MutationErrorKind,
}

impl MutationError {
    /// Creates a new MutationError with the given kind.
    pub const fn new(kind: MutationErrorKind) -> Self {
        Self { kind }
    }

    /// Returns the specific kind of mutation error that occurred.
    pub fn kind(&self) -> &MutationErrorKind {
        &self.kind
    }
}

/// Result type for list mutations.
pub type MutationResult<T> = Result<T, MutationError>;

/// Specific kinds of errors that can occur when parsing an intent string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntentErrorKind {
    #[error("unknown operation {0:?}")]
    UnknownOperation(String),

    #[error("missing list path")]
    MissingPath,

    #[error("missing index")]
    MissingIndex,

    #[error("invalid index {0:?}")]
    InvalidIndex(String),

    #[error("operation {0:?} does not take an index")]
    UnexpectedIndex(String),

    #[error("operation {0:?} does not take a value")]
    UnexpectedValue(String),

    #[error(transparent)]
    MalformedPath(#[from] PathError),

    #[error("invalid value payload: {0}")]
    Payload(DecodeError),
}

/// Error type returned when an intent field value is not a valid mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("intent error: {kind}")]
pub struct IntentError {
    kind: IntentErrorKind,
}

impl IntentError {
    /// Creates a new IntentError with the given kind.
    pub const fn new(kind: IntentErrorKind) -> Self {
        Self { kind }
    }

    /// Returns the specific kind of intent error that occurred.
    pub fn kind(&self) -> &IntentErrorKind {
        &self.kind
    }
}

/// Result type for intent parsing.
pub type IntentResult<T> = Result<T, IntentError>;

/// Specific kinds of errors that can occur while handling a submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionErrorKind {
    #[error(transparent)]
    Decode(DecodeError),

    #[error(transparent)]
    Intent(IntentError),

    #[error(transparent)]
    Mutation(MutationError),

    #[error("more than one intent in a single submission")]
    MultipleIntents,
}

/// Error type returned by [`Submission`](crate::Submission) handling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("submission error: {kind}")]
pub struct SubmissionError {
    kind: SubmissionErrorKind,
}

impl SubmissionError {
    /// Creates a new SubmissionError with the given kind.
    pub const fn new(kind: SubmissionErrorKind) -> Self {
        Self { kind }
    }

    /// Returns the specific kind of submission error that occurred.
    pub fn kind(&self) -> &SubmissionErrorKind {
        &self.kind
    }
}

impl From<DecodeError> for SubmissionError {
    fn from(err: DecodeError) -> Self {
        Self::new(SubmissionErrorKind::Decode(err))
    }
}

impl From<IntentError> for SubmissionError {
    fn from(err: IntentError) -> Self {
        Self::new(SubmissionErrorKind::Intent(err))
    }
}

impl From<MutationError> for SubmissionError {
    fn from(err: MutationError) -> Self {
        Self::new(SubmissionErrorKind::Mutation(err))
    }
}

/// Result type for submission handling.
pub type SubmissionResult<T> = Result<T, SubmissionError>;

/// Reasons a submitted value could not be read as a typed field.
///
/// These are user-facing: their `Display` output is the message stored in
/// [`FieldErrors`](crate::FieldErrors).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    #[error("required")]
    Required,

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("invalid date {0:?}")]
    InvalidDate(String),

    #[error("invalid choice {0:?}")]
    InvalidChoice(String),

    #[error("expected {expected}, got {actual}")]
    Expected {
        expected: &'static str,
        actual: &'static str,
    },
}
