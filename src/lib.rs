//! A deterministic patch engine for turning loosely structured LLM chat
//! output into a validated set of file mutations and applying them to an
//! in-memory project snapshot.
//!
//! The crate is pure: it performs no filesystem or network I/O. Callers
//! supply a [`Snapshot`] and get a new one back; configuration is passed in
//! explicitly via [`EngineConfig`] rather than read from the environment.

mod applier;
mod blocks;
mod classifier;
mod diff;
mod error;
mod fuzzy;
mod hunk;
mod linechange;
mod metadata;
mod planner;
mod schema;
mod search_replace;

pub use diff::apply_standard_diff;
pub use error::{ApplyError, DiffError};
pub use fuzzy::FuzzyConfig;
pub use linechange::line_changes;
pub use planner::OperationGroups;
pub use schema::{
    ControlMetadata, FileOperation, GitCommitMsg, LineDelta, ParsedResponse, PatchDialect,
    Snapshot,
};
pub use search_replace::apply_search_replace;

use tracing::{debug, warn};

/// The engine's only configuration surface: the fuzzy-match tunables for
/// [`apply_standard_diff`] and the line-window used when looking for a bare
/// (unfenced) control block. Constructed by the caller; never read from a
/// file or environment by this crate.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub fuzzy: FuzzyConfig,
    pub metadata_anchor_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fuzzy: FuzzyConfig::default(),
            metadata_anchor_window: 20,
        }
    }
}

/// Parse a raw response into a control block, an ordered list of file
/// operations, and the leftover reasoning text.
///
/// Returns `None` when no control block can be found, or when at least one
/// block was scanned but none of them classified into a valid operation.
/// Malformed blocks are otherwise dropped silently; this function never
/// panics on malformed input.
pub fn parse_response(raw: &str, config: &EngineConfig) -> Option<ParsedResponse> {
    let (control, residual) = metadata::extract_metadata(raw, config.metadata_anchor_window);
    let control = control?;

    let scanned = blocks::scan_blocks(&residual);
    let mut operations = Vec::with_capacity(scanned.len());
    let mut classified_spans = Vec::with_capacity(scanned.len());

    for block in &scanned {
        match classifier::classify_block(block.header_line, block.body) {
            Some(op) => {
                debug!(header = block.header_line, "block classified");
                operations.push(op);
                classified_spans.push(block.span.clone());
            }
            None => {
                debug!(header = block.header_line, "block dropped: did not classify");
            }
        }
    }

    if operations.is_empty() {
        warn!("no block classified into a valid operation; returning None");
        return None;
    }

    let reasoning = blocks::extract_reasoning(&residual, &classified_spans);

    Some(ParsedResponse {
        control,
        operations,
        reasoning,
    })
}

/// Resolve and apply a set of file operations against `originals`, returning
/// the new snapshot. Fails fast on the first error; the caller must not
/// treat a returned error as having partially mutated anything.
pub fn apply_operations(
    operations: &[FileOperation],
    originals: Snapshot,
    config: &EngineConfig,
) -> Result<Snapshot, ApplyError> {
    let mut snapshot = originals;
    let groups = planner::plan_operations(operations, &mut snapshot)?;
    applier::apply_groups(groups, snapshot, &config.fuzzy)
}

/// Expose the planner's grouping directly for callers who want to drive
/// per-file application themselves (e.g. in parallel). `snapshot` is
/// mutated to reflect every rename, matching [`apply_operations`]'s
/// behaviour.
pub fn plan_operations(
    operations: &[FileOperation],
    snapshot: &mut Snapshot,
) -> Result<OperationGroups, ApplyError> {
    planner::plan_operations(operations, snapshot)
}
