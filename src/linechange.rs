//! Line-change accounting: an LCS-based add/remove count per operation,
//! using a length-only two-row dynamic-programming table with the shorter
//! sequence on the inner axis (`O(m*n)` time, `O(min(m,n))` space).

use crate::schema::{FileOperation, LineDelta, Snapshot};

/// Compute the add/remove/difference counts for one operation, given the
/// snapshot before and after it was applied.
pub fn line_changes(op: &FileOperation, originals: &Snapshot, news: &Snapshot) -> LineDelta {
    match op {
        FileOperation::Rename { .. } => LineDelta::default(),
        FileOperation::Delete { path } => {
            let removed = content_of(originals, path).map(count_lines).unwrap_or(0);
            LineDelta {
                added: 0,
                removed,
                difference: removed,
            }
        }
        FileOperation::Write { path, .. } => {
            let old = content_of(originals, path);
            let new = content_of(news, path);
            compute_write_delta(old, new)
        }
    }
}

fn content_of<'a>(snapshot: &'a Snapshot, path: &str) -> Option<&'a str> {
    snapshot.get(path).and_then(|c| c.as_deref())
}

fn compute_write_delta(old: Option<&str>, new: Option<&str>) -> LineDelta {
    let old = old.unwrap_or("");
    let new = new.unwrap_or("");

    if old == new {
        return LineDelta::default();
    }
    if old.is_empty() {
        let added = count_lines(new);
        return LineDelta {
            added,
            removed: 0,
            difference: added,
        };
    }
    if new.is_empty() {
        let removed = count_lines(old);
        return LineDelta {
            added: 0,
            removed,
            difference: removed,
        };
    }

    let old_lines: Vec<&str> = old.split('\n').collect();
    let new_lines: Vec<&str> = new.split('\n').collect();
    let common = lcs_length(&old_lines, &new_lines);
    let added = new_lines.len() - common;
    let removed = old_lines.len() - common;
    LineDelta {
        added,
        removed,
        difference: added + removed,
    }
}

fn count_lines(s: &str) -> usize {
    if s.is_empty() { 0 } else { s.lines().count() }
}

/// Length of the longest common subsequence of `a` and `b`.
fn lcs_length<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];

    for lv in long {
        for j in 0..short.len() {
            curr[j + 1] = if *lv == short[j] {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}
