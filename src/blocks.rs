//! Fenced code-block scanner.
//!
//! Iterates the fenced regions of a response's residual text (after the
//! control block has been extracted) in source order, yielding the raw
//! opening-line text and body of each. No interpretation of the opening
//! line happens here; that is [`crate::classifier`]'s job.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```([^\n`]*)\r?\n(.*?)```").expect("static regex")
});

/// One fenced region: its raw opening-line text, its raw body, and the
/// byte range of the whole fenced region (including the backticks) within
/// the scanned text.
#[derive(Debug, Clone, PartialEq)]
pub struct Block<'a> {
    pub header_line: &'a str,
    pub body: &'a str,
    pub span: Range<usize>,
}

/// Scan `text` for fenced code regions, in source order. Regions are
/// disjoint: once a closing fence is matched, scanning resumes after it.
pub fn scan_blocks(text: &str) -> Vec<Block<'_>> {
    FENCE
        .captures_iter(text)
        .map(|cap| {
            let whole = cap.get(0).expect("group 0 always present");
            let header_line = cap.get(1).expect("capture group 1").as_str().trim();
            let body = cap.get(2).expect("capture group 2").as_str();
            Block {
                header_line,
                body,
                span: whole.range(),
            }
        })
        .collect()
}

/// Reconstruct the reasoning text: delete the extents of every classified
/// block from `text` and return the remaining non-empty, trimmed lines.
pub fn extract_reasoning(text: &str, classified_spans: &[Range<usize>]) -> Vec<String> {
    let mut residual = String::with_capacity(text.len());
    let mut cursor = 0usize;
    for span in classified_spans {
        if span.start < cursor {
            continue;
        }
        residual.push_str(&text[cursor..span.start]);
        cursor = span.end;
    }
    residual.push_str(&text[cursor..]);

    residual
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
