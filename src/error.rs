//! Error types for the patch engine.
//!
//! The parser itself never surfaces an error value to callers (it is
//! lossy-tolerant by design, see [`crate::metadata`] and [`crate::classifier`]);
//! [`ClassifyError`] and [`ControlError`] exist only to let those modules
//! decide when to fall through to the next strategy.

use thiserror::Error;

/// Errors produced while resolving and applying a set of file operations
/// against a snapshot.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// A delete targeted a path the snapshot does not track as present.
    #[error("cannot delete missing file: {path}")]
    CannotDeleteMissing { path: String },

    /// A rename's `from` path is not tracked as present in the snapshot.
    #[error("cannot rename missing file: {from}")]
    CannotRenameMissing { from: String },

    /// A search-replace write targeted a path with no current content.
    #[error("cannot apply search-replace to new file: {path}")]
    SearchReplaceOnNewFile { path: String },

    /// A header named a dialect the classifier does not recognise.
    #[error("unknown dialect: {value}")]
    UnknownDialect { value: String },

    /// A dialect engine failed to apply a write against a file's content.
    #[error("failed to patch {path}: {source}")]
    PatchFailed {
        path: String,
        #[source]
        source: DiffError,
    },
}

/// Errors produced by the two dialect engines, [`crate::diff::apply_standard_diff`]
/// and [`crate::search_replace::apply_search_replace`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DiffError {
    /// The diff body could not be parsed into at least one hunk/block.
    #[error("could not parse diff body: {message}")]
    Malformed { message: String },

    /// A hunk's context/removal lines could not be located anywhere in the
    /// target, even after offset and fuzzy search.
    #[error("hunk could not be located (expected near line {expected_line})")]
    HunkNotFound { expected_line: usize },

    /// A search-replace block's search text was not found in the current
    /// content.
    #[error("search text not found: {search_preview}")]
    NoMatch { search_preview: String },
}

/// Internal error used by the block classifier to decide whether a candidate
/// block should be dropped. Never surfaced to callers of [`crate::parse_response`].
#[derive(Debug, Error, Clone, PartialEq)]
pub(crate) enum ClassifyError {
    #[error("empty header")]
    EmptyHeader,
    #[error("invalid rename body: {0}")]
    InvalidRenameBody(String),
    #[error("unrecognised strategy token: {0}")]
    UnknownStrategy(String),
}

/// Internal error used by the metadata extractor to decide whether to fall
/// through to the next strategy. Never surfaced to callers.
#[derive(Debug, Error, Clone, PartialEq)]
pub(crate) enum ControlError {
    #[error("no candidate control block found")]
    NotFound,
    #[error("control block failed to parse: {0}")]
    ParseFailed(String),
    #[error("control block failed validation: {0}")]
    Invalid(String),
}
