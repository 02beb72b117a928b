//! Extraction of the trailing control block from a raw response.
//!
//! Two strategies are tried in order; the first to produce a schema-valid
//! [`ControlMetadata`] wins. See `SPEC_FULL.md` §4.2 for the rationale.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ControlError;
use crate::schema::ControlMetadata;

static FENCED_YAML: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```[ \t]*(?:yaml|yml)[ \t]*\r?\n(.*?)```").expect("static regex")
});

/// Extract the control block from `raw`, returning it alongside the
/// residual text with the winning block excised. Returns `(None, raw)`
/// unchanged when neither strategy finds a valid block.
pub fn extract_metadata(raw: &str, anchor_window: usize) -> (Option<ControlMetadata>, String) {
    if let Ok((control, residual)) = try_last_fenced_yaml(raw) {
        return (Some(control), residual);
    }
    if let Ok((control, residual)) = try_bare_tail(raw, anchor_window) {
        return (Some(control), residual);
    }
    (None, raw.to_string())
}

fn try_last_fenced_yaml(raw: &str) -> Result<(ControlMetadata, String), ControlError> {
    let mat = FENCED_YAML
        .captures_iter(raw)
        .last()
        .ok_or(ControlError::NotFound)?;
    let whole = mat.get(0).expect("group 0 always present");
    let body = mat.get(1).expect("capture group 1").as_str();

    let control: ControlMetadata =
        serde_yaml::from_str(body).map_err(|e| ControlError::ParseFailed(e.to_string()))?;
    control
        .validate()
        .map_err(|_| ControlError::Invalid("fenced control block failed validation".into()))?;

    let mut residual = String::with_capacity(raw.len() - whole.len());
    residual.push_str(&raw[..whole.start()]);
    residual.push_str(&raw[whole.end()..]);
    Ok((control, residual.trim().to_string()))
}

fn try_bare_tail(raw: &str, window: usize) -> Result<(ControlMetadata, String), ControlError> {
    let trimmed = raw.trim();

    let mut line_starts = Vec::new();
    let mut pos = 0usize;
    for line in trimmed.split('\n') {
        line_starts.push((pos, line));
        pos += line.len() + 1;
    }

    let window_start = line_starts.len().saturating_sub(window);
    for &(start, line) in &line_starts[window_start..] {
        if !line.trim_start().starts_with("projectId:") {
            continue;
        }
        let tail = &trimmed[start..];
        let control: ControlMetadata = match serde_yaml::from_str(tail) {
            Ok(c) => c,
            Err(_) => continue,
        };
        if control.validate().is_err() {
            continue;
        }
        let residual = trimmed[..start].trim_end().to_string();
        return Ok((control, residual));
    }
    Err(ControlError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_UUID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    #[test]
    fn extracts_single_fenced_block() {
        let raw = format!(
            "Here is my change.\n\n```yaml\nprojectId: demo\nuuid: {VALID_UUID}\n```\n"
        );
        let (control, residual) = extract_metadata(&raw, 20);
        let control = control.expect("control block expected");
        assert_eq!(control.project_id, "demo");
        assert_eq!(residual, "Here is my change.");
    }

    #[test]
    fn last_fenced_block_wins_when_multiple_are_valid() {
        let raw = format!(
            "```yaml\nprojectId: first\nuuid: {VALID_UUID}\n```\n\nMore text.\n\n```yaml\nprojectId: second\nuuid: {VALID_UUID}\n```\n"
        );
        let (control, _) = extract_metadata(&raw, 20);
        assert_eq!(control.unwrap().project_id, "second");
    }

    #[test]
    fn does_not_fall_back_to_earlier_valid_block_when_last_is_invalid() {
        let raw = format!(
            "```yaml\nprojectId: first\nuuid: {VALID_UUID}\n```\n\n```yaml\nprojectId: \n```\n"
        );
        let (control, _) = extract_metadata(&raw, 20);
        assert!(control.is_none(), "strategy 1 must not retry earlier blocks");
    }

    #[test]
    fn bare_tail_anchor_is_used_when_no_fence_present() {
        let raw = format!("Some reasoning.\nprojectId: demo\nuuid: {VALID_UUID}\n");
        let (control, residual) = extract_metadata(&raw, 20);
        let control = control.expect("control block expected");
        assert_eq!(control.project_id, "demo");
        assert_eq!(residual, "Some reasoning.");
    }

    #[test]
    fn bare_tail_outside_window_is_ignored() {
        let raw = format!("projectId: demo\nuuid: {VALID_UUID}\n");
        // window of 1 only scans the final line ("uuid: ..."), never reaching
        // the `projectId:` anchor one line above it.
        let (control, _) = extract_metadata(&raw, 1);
        assert!(control.is_none());
    }

    #[test]
    fn gives_up_when_no_candidate_found() {
        let (control, residual) = extract_metadata("just some plain text", 20);
        assert!(control.is_none());
        assert_eq!(residual, "just some plain text");
    }
}
