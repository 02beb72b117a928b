//! The operation algebra, control metadata, and snapshot types that every
//! other module in this crate is built around.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::ControlError;

/// A file snapshot: path to either its content, or `None` meaning the path
/// is tracked but currently has no file (as opposed to the path being
/// entirely absent from the map, which means "unknown to this snapshot").
pub type Snapshot = HashMap<String, Option<String>>;

/// The three ways a write's body can be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchDialect {
    /// The body is the full new file contents.
    Replace,
    /// The body is a unified diff (`--- / +++ / @@`).
    StandardDiff,
    /// The body is one or more `<<<<<<< SEARCH` blocks.
    SearchReplace,
}

impl Default for PatchDialect {
    fn default() -> Self {
        Self::Replace
    }
}

impl PatchDialect {
    /// Parse a dialect token from a header's trailing strategy word.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "replace" => Some(Self::Replace),
            "standard-diff" => Some(Self::StandardDiff),
            "search-replace" => Some(Self::SearchReplace),
            _ => None,
        }
    }
}

/// A single file-level mutation recovered from a response.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOperation {
    Write {
        path: String,
        content: String,
        dialect: PatchDialect,
    },
    Delete {
        path: String,
    },
    Rename {
        from: String,
        to: String,
    },
}

impl FileOperation {
    /// The path this operation reads its current content from, if any.
    /// A rename has no single "current path" in this sense; callers that
    /// need rename handling should match on the variant directly.
    pub fn target_path(&self) -> Option<&str> {
        match self {
            Self::Write { path, .. } | Self::Delete { path } => Some(path),
            Self::Rename { .. } => None,
        }
    }
}

/// `gitCommitMsg` may be a single string or a list of strings in the wild;
/// both are accepted and neither is otherwise interpreted.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum GitCommitMsg {
    Single(String),
    Multiple(Vec<String>),
}

/// The trailing control block. `change_summary` entries are opaque
/// single-key mappings the engine never interprets.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ControlMetadata {
    #[serde(rename = "projectId")]
    pub project_id: String,
    pub uuid: String,
    #[serde(default, rename = "changeSummary")]
    pub change_summary: Option<Vec<serde_yaml::Mapping>>,
    #[serde(default, rename = "gitCommitMsg")]
    pub git_commit_msg: Option<GitCommitMsg>,
    #[serde(default, rename = "promptSummary")]
    pub prompt_summary: Option<String>,
}

impl ControlMetadata {
    /// Validate the required fields: `project_id` non-empty, `uuid` a
    /// well-formed UUID. Unknown fields are already tolerated by serde;
    /// this only enforces the schema's required-field constraints.
    pub(crate) fn validate(&self) -> Result<(), ControlError> {
        if self.project_id.trim().is_empty() {
            return Err(ControlError::Invalid("projectId is empty".into()));
        }
        uuid::Uuid::parse_str(&self.uuid)
            .map_err(|e| ControlError::Invalid(format!("uuid is not valid: {e}")))?;
        Ok(())
    }
}

/// The full result of parsing one raw response: the control block, the
/// ordered operations recovered from it, and the leftover reasoning text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    pub control: ControlMetadata,
    pub operations: Vec<FileOperation>,
    pub reasoning: Vec<String>,
}

/// Per-operation line-change accounting, returned by [`crate::line_changes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineDelta {
    pub added: usize,
    pub removed: usize,
    pub difference: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_defaults_to_replace() {
        assert_eq!(PatchDialect::default(), PatchDialect::Replace);
    }

    #[test]
    fn dialect_from_token_rejects_unknown() {
        assert_eq!(PatchDialect::from_token("replace"), Some(PatchDialect::Replace));
        assert_eq!(PatchDialect::from_token("yolo"), None);
    }

    #[test]
    fn control_metadata_requires_valid_uuid() {
        let control = ControlMetadata {
            project_id: "proj".into(),
            uuid: "not-a-uuid".into(),
            ..Default::default()
        };
        assert!(control.validate().is_err());
    }

    #[test]
    fn control_metadata_rejects_empty_project_id() {
        let control = ControlMetadata {
            project_id: "   ".into(),
            uuid: "3fa85f64-5717-4562-b3fc-2c963f66afa6".into(),
            ..Default::default()
        };
        assert!(control.validate().is_err());
    }

    #[test]
    fn control_metadata_accepts_valid_block() {
        let control = ControlMetadata {
            project_id: "proj".into(),
            uuid: "3fa85f64-5717-4562-b3fc-2c963f66afa6".into(),
            ..Default::default()
        };
        assert!(control.validate().is_ok());
    }
}
