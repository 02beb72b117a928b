//! Operation planner: partitions renames from other operations, resolves
//! path aliasing, repairs stale paths by suffix match, and groups the
//! remaining operations by their final path.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::ApplyError;
use crate::schema::{FileOperation, PatchDialect, Snapshot};

/// Operations ready for application, grouped by final path, in first-seen
/// order.
pub type OperationGroups = Vec<(String, Vec<FileOperation>)>;

/// Plan the operations against `snapshot`, mutating it in place to reflect
/// every rename (non-rename operations are left for [`crate::applier`] to
/// apply). Returns the grouped, path-resolved op chains.
pub fn plan_operations(
    operations: &[FileOperation],
    snapshot: &mut Snapshot,
) -> Result<OperationGroups, ApplyError> {
    let mut renames = Vec::new();
    let mut others = Vec::new();
    for op in operations {
        match op {
            FileOperation::Rename { from, to } => renames.push((from.clone(), to.clone())),
            other => others.push(other.clone()),
        }
    }

    let rewrite = apply_renames(&renames, snapshot)?;
    remap(&mut others, &rewrite);
    repair_stale_paths(&mut others, snapshot);

    Ok(group_by_final_path(others))
}

/// Apply every rename sequentially, updating `snapshot` and returning the
/// transitively-closed path-rewrite map.
fn apply_renames(
    renames: &[(String, String)],
    snapshot: &mut Snapshot,
) -> Result<HashMap<String, String>, ApplyError> {
    let mut rewrite: HashMap<String, String> = HashMap::new();

    for (from, to) in renames {
        let content = match snapshot.get(from) {
            Some(c) => c.clone(),
            None => {
                return Err(ApplyError::CannotRenameMissing { from: from.clone() });
            }
        };
        snapshot.insert(from.clone(), None);
        snapshot.insert(to.clone(), content);

        for existing_target in rewrite.values_mut() {
            if existing_target == from {
                *existing_target = to.clone();
            }
        }
        rewrite.insert(from.clone(), to.clone());
        debug!(from = %from, to = %to, "rename applied");
    }

    Ok(rewrite)
}

fn remap(operations: &mut [FileOperation], rewrite: &HashMap<String, String>) {
    for op in operations.iter_mut() {
        let path = match op {
            FileOperation::Write { path, .. } | FileOperation::Delete { path } => path,
            FileOperation::Rename { .. } => continue,
        };
        if let Some(new_path) = rewrite.get(path) {
            debug!(from = %path, to = %new_path, "path remapped through rename chain");
            *path = new_path.clone();
        }
    }
}

/// For each delete or non-`replace` write whose target path is missing from
/// the snapshot, attempt to reattach it to the unique snapshot path sharing
/// its basename, breaking ties by longest matching path suffix.
fn repair_stale_paths(operations: &mut [FileOperation], snapshot: &Snapshot) {
    for op in operations.iter_mut() {
        let (path, eligible) = match op {
            FileOperation::Delete { path } => (path, true),
            FileOperation::Write { path, dialect, .. } => {
                (path, *dialect != PatchDialect::Replace)
            }
            FileOperation::Rename { .. } => continue,
        };
        if !eligible || snapshot.contains_key(path) {
            continue;
        }
        if let Some(repaired) = find_repair_candidate(path, snapshot) {
            warn!(original = %path, repaired = %repaired, "fuzzy path repair applied");
            *path = repaired;
        }
    }
}

fn find_repair_candidate(target: &str, snapshot: &Snapshot) -> Option<String> {
    let target_base = basename(target);
    let candidates: Vec<&String> = snapshot
        .keys()
        .filter(|k| basename(k) == target_base)
        .collect();

    match candidates.len() {
        0 => None,
        1 => Some(candidates[0].clone()),
        _ => {
            let mut best_score = 0usize;
            let mut best: Option<&String> = None;
            let mut tied = false;
            for candidate in &candidates {
                let score = suffix_match_score(candidate, target);
                match score.cmp(&best_score) {
                    std::cmp::Ordering::Greater => {
                        best_score = score;
                        best = Some(candidate);
                        tied = false;
                    }
                    std::cmp::Ordering::Equal => tied = true,
                    std::cmp::Ordering::Less => {}
                }
            }
            if tied { None } else { best.cloned() }
        }
    }
}

fn basename(path: &str) -> String {
    let normalised = path.replace('\\', "/");
    normalised.rsplit('/').next().unwrap_or("").to_string()
}

fn suffix_match_score(candidate: &str, target: &str) -> usize {
    let candidate_norm = candidate.replace('\\', "/");
    let target_norm = target.replace('\\', "/");
    let candidate_segments: Vec<&str> = candidate_norm.split('/').rev().collect();
    let target_segments: Vec<&str> = target_norm.split('/').rev().collect();
    candidate_segments
        .iter()
        .zip(target_segments.iter())
        .take_while(|(a, b)| a == b)
        .count()
}

fn group_by_final_path(operations: Vec<FileOperation>) -> OperationGroups {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<FileOperation>> = HashMap::new();

    for op in operations {
        let path = match &op {
            FileOperation::Write { path, .. } | FileOperation::Delete { path } => path.clone(),
            FileOperation::Rename { .. } => unreachable!("renames filtered out earlier"),
        };
        if !groups.contains_key(&path) {
            order.push(path.clone());
        }
        groups.entry(path).or_default().push(op);
    }

    order
        .into_iter()
        .map(|path| {
            let ops = groups.remove(&path).expect("path was just inserted");
            (path, ops)
        })
        .collect()
}
