//! `apply_search_replace`: applies one or more `<<<<<<< SEARCH` blocks
//! against a string using exact substring matching, following the
//! exact-match `Range`-style design shared by several LLM-patch tools in
//! the reference corpus.

use tracing::debug;

use crate::error::DiffError;

struct SearchReplaceBlock {
    search: String,
    replace: String,
}

/// Apply every `<<<<<<< SEARCH` block in `diff`, in order, against a single
/// running string derived from `original`.
pub fn apply_search_replace(original: &str, diff: &str) -> Result<String, DiffError> {
    let blocks = parse_blocks(diff);
    let mut current = original.to_string();

    for block in blocks {
        if block.search.is_empty() {
            current.push_str(&block.replace);
            continue;
        }
        match current.find(&block.search) {
            Some(idx) => {
                current.replace_range(idx..idx + block.search.len(), &block.replace);
            }
            None => {
                let preview: String = block.search.chars().take(60).collect();
                return Err(DiffError::NoMatch {
                    search_preview: preview,
                });
            }
        }
    }

    Ok(current)
}

fn parse_blocks(diff: &str) -> Vec<SearchReplaceBlock> {
    let lines: Vec<&str> = diff.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].trim_end() != "<<<<<<< SEARCH" {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        let mut search_lines = Vec::new();
        let mut found_separator = false;
        while j < lines.len() {
            if lines[j].trim_end() == "=======" {
                found_separator = true;
                break;
            }
            search_lines.push(lines[j]);
            j += 1;
        }
        if !found_separator {
            debug!("dropping search-replace block missing ======= separator");
            i += 1;
            continue;
        }

        let mut k = j + 1;
        let mut replace_lines = Vec::new();
        let mut found_end = false;
        while k < lines.len() {
            if lines[k].trim_end() == ">>>>>>> REPLACE" {
                found_end = true;
                break;
            }
            replace_lines.push(lines[k]);
            k += 1;
        }
        if !found_end {
            debug!("dropping search-replace block missing >>>>>>> REPLACE marker");
            i += 1;
            continue;
        }

        blocks.push(SearchReplaceBlock {
            search: search_lines.join("\n"),
            replace: replace_lines.join("\n"),
        });
        i = k + 1;
    }

    blocks
}
