//! formwire_dump pretty-prints `application/x-www-form-urlencoded` bodies as
//! the nested values formwire decodes them into.
//!
//! This crate is primarily used as a binary (`form2tree`) for checking what
//! a form actually submits, including any list intent it carries.

mod format;

use formwire::{FieldErrors, Submission, SubmissionError};

pub use crate::format::Tree;

/// Decodes an urlencoded body and formats it as a tree.
///
/// An intent, if present, is shown on a trailing `intent:` line and is not
/// applied.
pub fn form2tree(data: &[u8]) -> Result<String, SubmissionError> {
    let submission = Submission::from_urlencoded(data)?;
    let mut output = Tree(submission.value()).to_string();
    if let Some(intent) = submission.intent() {
        output.push_str("\nintent: ");
        output.push_str(&intent.to_string());
    }
    Ok(output)
}

/// Decodes an urlencoded body, applies its intent, and formats the result.
pub fn form2tree_applied(data: &[u8]) -> Result<String, SubmissionError> {
    let submission = Submission::from_urlencoded(data)?;
    if let Some(intent) = submission.intent() {
        tracing::info!(%intent, "applying intent");
    }
    let state = submission.reply(FieldErrors::new())?;
    Ok(Tree(&state.value).to_string())
}
