//! Patch applier: applies each file's op chain (produced by [`crate::planner`])
//! against the snapshot, dispatching each write to its dialect engine.

use tracing::debug;

use crate::diff::apply_standard_diff;
use crate::error::ApplyError;
use crate::fuzzy::FuzzyConfig;
use crate::schema::{FileOperation, PatchDialect, Snapshot};
use crate::search_replace::apply_search_replace;

/// Apply every file's op chain against `snapshot`, returning the new
/// snapshot. Fails fast: the first error across all chains aborts the
/// whole call, and the caller must not observe a partially applied result.
pub fn apply_groups(
    groups: Vec<(String, Vec<FileOperation>)>,
    mut snapshot: Snapshot,
    fuzzy_config: &FuzzyConfig,
) -> Result<Snapshot, ApplyError> {
    for (path, ops) in groups {
        let mut current = snapshot.get(&path).cloned().flatten();
        for op in ops {
            current = apply_one(&path, current, op, fuzzy_config)?;
        }
        debug!(path = %path, "file op chain applied");
        snapshot.insert(path, current);
    }
    Ok(snapshot)
}

fn apply_one(
    path: &str,
    current: Option<String>,
    op: FileOperation,
    fuzzy_config: &FuzzyConfig,
) -> Result<Option<String>, ApplyError> {
    match op {
        FileOperation::Rename { .. } => unreachable!("renames are resolved before grouping"),
        FileOperation::Delete { .. } => {
            if current.is_none() {
                return Err(ApplyError::CannotDeleteMissing {
                    path: path.to_string(),
                });
            }
            Ok(None)
        }
        FileOperation::Write {
            dialect, content, ..
        } => match dialect {
            PatchDialect::Replace => Ok(Some(content)),
            PatchDialect::StandardDiff => {
                let base = current.unwrap_or_default();
                let patched =
                    apply_standard_diff(&base, &content, fuzzy_config).map_err(|source| {
                        ApplyError::PatchFailed {
                            path: path.to_string(),
                            source,
                        }
                    })?;
                Ok(Some(patched))
            }
            PatchDialect::SearchReplace => {
                let base = current.ok_or_else(|| ApplyError::SearchReplaceOnNewFile {
                    path: path.to_string(),
                })?;
                let patched =
                    apply_search_replace(&base, &content).map_err(|source| ApplyError::PatchFailed {
                        path: path.to_string(),
                        source,
                    })?;
                Ok(Some(patched))
            }
        },
    }
}
