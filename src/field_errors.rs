use indexmap::IndexMap;

use crate::path::{Path, Segment};
use crate::{FieldErrorKind, Mutation};

/// Validation messages keyed by the path of the field they belong to.
///
/// Keys are the same paths the encoder names fields with, so a message can be
/// rendered next to the input it is about. Messages that belong to the form
/// as a whole are kept separately.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors {
    form: Vec<String>,
    fields: IndexMap<Path, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message for the field at `path`.
    pub fn add(&mut self, path: &Path, message: impl Into<String>) {
        self.fields
            .entry(path.clone())
            .or_default()
            .push(message.into());
    }

    /// Adds a message about the whole form.
    pub fn add_form(&mut self, message: impl Into<String>) {
        self.form.push(message.into());
    }

    /// Records a typed extraction failure at `path`, or against the form when
    /// there is no path.
    pub fn report(&mut self, path: Option<&Path>, kind: FieldErrorKind) {
        match path {
            Some(path) => self.add(path, kind.to_string()),
            None => self.add_form(kind.to_string()),
        }
    }

    /// Returns the messages for exactly `path`.
    pub fn get(&self, path: &Path) -> &[String] {
        self.fields.get(path).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the messages about the whole form.
    pub fn form_errors(&self) -> &[String] {
        &self.form
    }

    /// Returns true if `path` or anything below it has messages.
    pub fn is_invalid(&self, path: &Path) -> bool {
        self.fields.keys().any(|p| p.starts_with(path))
    }

    pub fn is_empty(&self) -> bool {
        self.form.is_empty() && self.fields.is_empty()
    }

    /// Returns the number of fields with messages.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterates over fields with messages, in the order first reported.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[String])> {
        self.fields.iter().map(|(p, m)| (p, m.as_slice()))
    }

    /// Re-keys messages after `mutation` was applied to the value they
    /// describe.
    ///
    /// Removing an element drops its messages and moves those of later
    /// elements down one position. Replacing an element drops its messages.
    pub fn retarget(&mut self, mutation: &Mutation) {
        let (list, index, shift) = match mutation {
            Mutation::Append { .. } => return,
            Mutation::Remove { path, index } => (path, *index, true),
            Mutation::Replace { path, index, .. } => (path, *index, false),
        };
        let depth = list.len();

        let fields = std::mem::take(&mut self.fields);
        for (mut path, messages) in fields {
            let element = match path.segments().get(depth) {
                Some(Segment::Index(i)) if path.starts_with(list) => Some(*i),
                _ => None,
            };
            let Some(element) = element else {
                self.fields.insert(path, messages);
                continue;
            };
            if element == index {
                continue;
            }
            if shift && element > index {
                path.set_segment(depth, Segment::Index(element - 1));
            }
            self.fields.entry(path).or_default().extend(messages);
        }
    }
}

impl Extend<(Path, String)> for FieldErrors {
    fn extend<I: IntoIterator<Item = (Path, String)>>(&mut self, iter: I) {
        for (path, message) in iter {
            self.add(&path, message);
        }
    }
}
