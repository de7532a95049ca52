use crate::entry::{Entry, parse_urlencoded};
use crate::{
    Decoder, EncodeResult, FieldErrors, INTENT_FIELD, IntentError, Mutation, Path,
    SubmissionError, SubmissionErrorKind, SubmissionResult, Value, encode,
};

/// One decoded form submission, with its list intent split out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    value: Value,
    intent: Option<Mutation>,
}

impl Submission {
    /// Decodes `entries`, treating an [`INTENT_FIELD`] entry as a list
    /// mutation rather than data.
    pub fn parse<I>(entries: I) -> SubmissionResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<Entry>,
    {
        Self::parse_with_intent_field(entries, INTENT_FIELD)
    }

    /// Like [`Submission::parse`], with a different reserved field name.
    pub fn parse_with_intent_field<I>(entries: I, intent_field: &str) -> SubmissionResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<Entry>,
    {
        let mut decoder = Decoder::new();
        let mut intent = None;
        for entry in entries {
            let entry = entry.into();
            if entry.name != intent_field {
                decoder.push(&entry.name, entry.value)?;
                continue;
            }
            if intent.is_some() {
                return Err(SubmissionError::new(SubmissionErrorKind::MultipleIntents));
            }
            let mutation: Mutation = entry.value.parse().map_err(|err: IntentError| {
                tracing::debug!(intent = %entry.value, error = %err, "invalid intent");
                err
            })?;
            tracing::debug!(intent = %mutation, "submission carries an intent");
            intent = Some(mutation);
        }
        Ok(Submission {
            value: decoder.finish(),
            intent,
        })
    }

    /// Decodes an `application/x-www-form-urlencoded` request body.
    pub fn from_urlencoded(body: &[u8]) -> SubmissionResult<Self> {
        Self::parse(parse_urlencoded(body))
    }

    /// The submitted data, without the intent.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn intent(&self) -> Option<&Mutation> {
        self.intent.as_ref()
    }

    /// Returns true if this submission only asked for a list edit, in which
    /// case the form should be re-rendered rather than processed.
    pub fn is_intent(&self) -> bool {
        self.intent.is_some()
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Builds the state for the next render: the intent, if any, is applied
    /// to the value, and `errors` are re-keyed to match.
    pub fn reply(self, mut errors: FieldErrors) -> SubmissionResult<FormState> {
        let mut value = self.value;
        if let Some(mutation) = &self.intent {
            mutation.apply(&mut value)?;
            errors.retarget(mutation);
        }
        Ok(FormState { value, errors })
    }
}

/// Everything needed to render a form: the current value and the messages
/// to show next to its fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    pub value: Value,
    pub errors: FieldErrors,
}

impl FormState {
    /// State for a first render, before anything was submitted.
    pub fn new(value: Value) -> Self {
        FormState {
            value,
            errors: FieldErrors::new(),
        }
    }

    /// The value as entries, in field order.
    pub fn entries(&self) -> EncodeResult<Vec<Entry>> {
        encode(&self.value)
    }

    /// The current value of the field at `path`.
    pub fn initial(&self, path: &Path) -> Option<&Value> {
        self.value.get(path)
    }

    pub fn errors_for(&self, path: &Path) -> &[String] {
        self.errors.get(path)
    }

    /// Applies a further mutation, keeping errors aligned with it.
    pub fn apply(&mut self, mutation: &Mutation) -> SubmissionResult<()> {
        mutation.apply(&mut self.value)?;
        self.errors.retarget(mutation);
        Ok(())
    }
}
