//! `apply_standard_diff`: parses a unified-diff body scoped to a single file
//! and applies its hunks, recovering from small context drift the same way
//! the reference patch-application crate's hunk applier does (offset search,
//! then similarity-scored fuzzy search).

use tracing::warn;

use crate::error::DiffError;
use crate::fuzzy::{FuzzyConfig, FuzzyMatcher};
use crate::hunk::{Hunk, HunkLine};

/// Apply a unified-diff body to `original`, returning the patched content.
pub fn apply_standard_diff(
    original: &str,
    diff: &str,
    fuzzy_config: &FuzzyConfig,
) -> Result<String, DiffError> {
    let hunks = parse_hunks(diff)?;
    if hunks.is_empty() {
        return Err(DiffError::Malformed {
            message: "no hunks found in diff body".into(),
        });
    }

    let matcher = FuzzyMatcher::new(fuzzy_config.clone());
    let mut result_lines = split_lines(original);
    let mut line_offset: isize = 0;

    let mut ordered: Vec<&Hunk> = hunks.iter().collect();
    ordered.sort_by_key(|h| h.old_start);

    for hunk in ordered {
        let suggested_start = if hunk.old_start > 0 {
            ((hunk.old_start as isize - 1) + line_offset).max(0) as usize
        } else {
            0
        };

        let match_lines = hunk.match_lines();
        let (actual_start, quality) = matcher
            .find_position(&result_lines, &match_lines, suggested_start)
            .ok_or(DiffError::HunkNotFound {
                expected_line: hunk.old_start,
            })?;

        if !quality.is_exact() {
            warn!(
                expected_line = hunk.old_start,
                applied_line = actual_start + 1,
                quality = ?quality,
                "standard-diff hunk applied away from its expected position"
            );
        }

        let replacement: Vec<String> = hunk.result_lines().into_iter().map(String::from).collect();
        let lines_to_remove = match_lines.len();
        let end_idx = (actual_start + lines_to_remove).min(result_lines.len());
        let lines_added = replacement.len();
        result_lines.splice(actual_start..end_idx, replacement);
        line_offset += lines_added as isize - lines_to_remove as isize;
    }

    Ok(join_lines(&result_lines, original))
}

fn split_lines(s: &str) -> Vec<String> {
    if s.is_empty() {
        Vec::new()
    } else {
        s.lines().map(String::from).collect()
    }
}

fn join_lines(lines: &[String], original: &str) -> String {
    let mut out = lines.join("\n");
    if original.is_empty() || original.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn parse_hunks(diff: &str) -> Result<Vec<Hunk>, DiffError> {
    let mut hunks = Vec::new();
    let mut current: Option<Hunk> = None;

    for line in diff.lines() {
        if line.starts_with("--- ") || line.starts_with("+++ ") {
            continue;
        }
        if line.starts_with("@@") {
            if let Some(hunk) = current.take() {
                hunks.push(hunk);
            }
            current = Some(parse_hunk_header(line).ok_or_else(|| DiffError::Malformed {
                message: format!("invalid hunk header: {line}"),
            })?);
            continue;
        }
        if let Some(hunk) = current.as_mut() {
            if let Some(content) = line.strip_prefix('+') {
                hunk.lines.push(HunkLine::Add(content.to_string()));
            } else if let Some(content) = line.strip_prefix('-') {
                hunk.lines.push(HunkLine::Remove(content.to_string()));
            } else if let Some(content) = line.strip_prefix(' ') {
                hunk.lines.push(HunkLine::Context(content.to_string()));
            } else if line.is_empty() {
                hunk.lines.push(HunkLine::Context(String::new()));
            }
            // "\ No newline at end of file" and anything else is ignored.
        }
    }
    if let Some(hunk) = current.take() {
        hunks.push(hunk);
    }
    Ok(hunks)
}

fn parse_hunk_header(line: &str) -> Option<Hunk> {
    let line = line.trim();
    if !line.starts_with("@@") {
        return None;
    }
    let end_marker = line[2..].find("@@")?;
    let range_part = line[2..2 + end_marker].trim();
    let parts: Vec<&str> = range_part.split_whitespace().collect();
    if parts.len() < 2 {
        return None;
    }
    let (old_start, old_count) = parse_range(parts[0].trim_start_matches('-'))?;
    let (new_start, new_count) = parse_range(parts[1].trim_start_matches('+'))?;
    Some(Hunk::new(old_start, old_count, new_start, new_count))
}

fn parse_range(s: &str) -> Option<(usize, usize)> {
    let parts: Vec<&str> = s.split(',').collect();
    let start: usize = parts.first()?.parse().ok()?;
    let count: usize = parts.get(1).and_then(|c| c.parse().ok()).unwrap_or(1);
    Some((start, count))
}
