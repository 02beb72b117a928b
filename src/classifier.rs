//! Turns one scanned `(header_line, body)` pair into a [`FileOperation`],
//! or drops it silently when it doesn't match any recognised shape.

use serde::Deserialize;

use crate::error::ClassifyError;
use crate::schema::{FileOperation, PatchDialect};

const DELETE_SENTINEL: &str = "//TODO: delete this file";
const RENAME_HEADER: &str = "rename-file";

#[derive(Debug, Deserialize)]
struct RenameBody {
    from: String,
    to: String,
}

/// Classify one block. Returns `None` for anything malformed; malformed
/// blocks are evidence of reasoning text, not a directive, and are never
/// treated as an error by callers.
pub fn classify_block(header_line: &str, body: &str) -> Option<FileOperation> {
    classify(header_line, body).ok()
}

fn classify(header_line: &str, body: &str) -> Result<FileOperation, ClassifyError> {
    let normalised = normalise_header(header_line)?;

    if normalised == RENAME_HEADER {
        return classify_rename(body);
    }

    let (path, dialect_token) = split_path_and_strategy(normalised)?;
    let trimmed_body = body.trim();

    if trimmed_body == DELETE_SENTINEL {
        return Ok(FileOperation::Delete { path });
    }

    let dialect = match dialect_token {
        Some(token) => PatchDialect::from_token(&token)
            .ok_or(ClassifyError::UnknownStrategy(token))?,
        None => infer_dialect(body),
    };

    let content = match dialect {
        PatchDialect::Replace => strip_leading_newline(body),
        PatchDialect::StandardDiff | PatchDialect::SearchReplace => body.to_string(),
    };

    Ok(FileOperation::Write {
        path,
        content,
        dialect,
    })
}

/// Step 1: trim, then keep only text after the first `//` if present.
fn normalise_header(header_line: &str) -> Result<&str, ClassifyError> {
    let trimmed = header_line.trim();
    let normalised = match trimmed.find("//") {
        Some(idx) => trimmed[idx + 2..].trim(),
        None => trimmed,
    };
    if normalised.is_empty() {
        return Err(ClassifyError::EmptyHeader);
    }
    Ok(normalised)
}

fn classify_rename(body: &str) -> Result<FileOperation, ClassifyError> {
    let parsed: RenameBody = serde_json::from_str(body.trim())
        .map_err(|e| ClassifyError::InvalidRenameBody(e.to_string()))?;
    if parsed.from.is_empty() || parsed.to.is_empty() {
        return Err(ClassifyError::InvalidRenameBody(
            "from/to must be non-empty".into(),
        ));
    }
    Ok(FileOperation::Rename {
        from: parsed.from,
        to: parsed.to,
    })
}

/// Step 3: path/dialect extraction. A quoted path's trailing word, if
/// present, must be a valid strategy literal or the block is rejected — the
/// quotes unambiguously delimit the path, so anything after them can only be
/// a (possibly misspelled) strategy. An unquoted header has no such
/// delimiter: if its last whitespace-separated token is a known strategy it
/// is split off, otherwise the whole header is the path (this is what lets
/// unquoted paths containing spaces work).
fn split_path_and_strategy(header: &str) -> Result<(String, Option<String>), ClassifyError> {
    if let Some(rest) = header.strip_prefix('"') {
        if let Some(end) = rest.find('"') {
            let path = rest[..end].to_string();
            let remainder = rest[end + 1..].trim();
            if remainder.is_empty() {
                return Ok((path, None));
            }
            return if is_strategy_token(remainder) {
                Ok((path, Some(remainder.to_string())))
            } else {
                Err(ClassifyError::UnknownStrategy(remainder.to_string()))
            };
        }
    }

    let tokens: Vec<&str> = header.split_whitespace().collect();
    if let Some((&last, rest)) = tokens.split_last() {
        if rest.is_empty() {
            return Ok((last.to_string(), None));
        }
        if is_strategy_token(last) {
            return Ok((rest.join(" "), Some(last.to_string())));
        }
    }
    Ok((header.to_string(), None))
}

fn is_strategy_token(token: &str) -> bool {
    matches!(token, "replace" | "standard-diff" | "search-replace")
}

/// Step 5: infer the dialect from body shape when no strategy was given.
fn infer_dialect(body: &str) -> PatchDialect {
    let has_search_marker = body.lines().any(|l| l.starts_with("<<<<<<< SEARCH"));
    if has_search_marker && body.contains(">>>>>>> REPLACE") {
        return PatchDialect::SearchReplace;
    }
    if body.starts_with("--- ") && body.contains("+++ ") && body.contains("@@") {
        return PatchDialect::StandardDiff;
    }
    PatchDialect::Replace
}

/// Step 6: strip at most one leading newline from a `replace` body.
fn strip_leading_newline(body: &str) -> String {
    body.strip_prefix("\r\n")
        .or_else(|| body.strip_prefix('\n'))
        .unwrap_or(body)
        .to_string()
}
