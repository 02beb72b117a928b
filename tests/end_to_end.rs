//! Integration test exercising the full pipeline — `parse_response`,
//! `apply_operations`, and `line_changes` — across the literal end-to-end
//! scenarios this engine is specified against.

use std::collections::HashMap;

use patchkit::{apply_operations, line_changes, parse_response, ApplyError, EngineConfig, Snapshot};

const VALID_UUID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn control_block(project: &str) -> String {
    format!("```yaml\nprojectId: {project}\nuuid: {VALID_UUID}\n```\n")
}

#[test]
fn scenario_1_replace_write() {
    let raw = format!(
        "```ts\n// src/a.ts\nconst x = 1;\n```\n\n{}",
        control_block("demo")
    );
    let config = EngineConfig::default();
    let parsed = parse_response(&raw, &config).expect("control block present");
    assert_eq!(parsed.operations.len(), 1);

    let originals: Snapshot = HashMap::new();
    let result = apply_operations(&parsed.operations, originals.clone(), &config).unwrap();
    assert_eq!(
        result.get("src/a.ts").unwrap().as_deref(),
        Some("const x = 1;\n")
    );

    let delta = line_changes(&parsed.operations[0], &originals, &result);
    assert_eq!(delta.added, 1);
    assert_eq!(delta.removed, 0);
}

#[test]
fn scenario_2_delete() {
    let raw = format!(
        "```ts\nsrc/old.ts\n//TODO: delete this file\n```\n\n{}",
        control_block("demo")
    );
    let config = EngineConfig::default();
    let parsed = parse_response(&raw, &config).unwrap();

    let mut originals: Snapshot = HashMap::new();
    originals.insert("src/old.ts".to_string(), Some("one\ntwo\n".to_string()));
    let result = apply_operations(&parsed.operations, originals.clone(), &config).unwrap();
    assert_eq!(result.get("src/old.ts").unwrap(), &None);

    let delta = line_changes(&parsed.operations[0], &originals, &result);
    assert_eq!(delta.removed, 2);
    assert_eq!(delta.added, 0);
}

#[test]
fn scenario_3_rename_then_write() {
    let raw = format!(
        "```json\nrename-file\n{{\"from\":\"a.ts\",\"to\":\"b.ts\"}}\n```\n\n```ts\na.ts standard-diff\n--- a/a.ts\n+++ b/a.ts\n@@ -1,1 +1,1 @@\n-old\n+new\n```\n\n{}",
        control_block("demo")
    );
    let config = EngineConfig::default();
    let parsed = parse_response(&raw, &config).unwrap();
    assert_eq!(parsed.operations.len(), 2);

    let mut originals: Snapshot = HashMap::new();
    originals.insert("a.ts".to_string(), Some("old\n".to_string()));
    let result = apply_operations(&parsed.operations, originals, &config).unwrap();
    assert_eq!(result.get("a.ts").unwrap(), &None);
    assert_eq!(result.get("b.ts").unwrap().as_deref(), Some("new\n"));
}

#[test]
fn scenario_4_fuzzy_repair() {
    let raw = format!(
        "```ts\nutil.ts search-replace\n<<<<<<< SEARCH\nold value\n=======\nnew value\n>>>>>>> REPLACE\n```\n\n{}",
        control_block("demo")
    );
    let config = EngineConfig::default();
    let parsed = parse_response(&raw, &config).unwrap();

    let mut originals: Snapshot = HashMap::new();
    originals.insert(
        "src/deep/util.ts".to_string(),
        Some("old value\n".to_string()),
    );
    let result = apply_operations(&parsed.operations, originals, &config).unwrap();
    assert_eq!(
        result.get("src/deep/util.ts").unwrap().as_deref(),
        Some("new value\n")
    );
    assert!(result.get("util.ts").is_none());
}

#[test]
fn scenario_5_multiple_yaml_blocks_last_wins() {
    let raw = format!(
        "```yaml\nprojectId: \n```\n\n```ts\na.ts\ncontent\n```\n\n{}",
        control_block("second")
    );
    let parsed = parse_response(&raw, &EngineConfig::default()).unwrap();
    assert_eq!(parsed.control.project_id, "second");
}

#[test]
fn scenario_6_search_replace_on_new_file_fails() {
    let raw = format!(
        "```ts\nnew.ts search-replace\n<<<<<<< SEARCH\nx\n=======\ny\n>>>>>>> REPLACE\n```\n\n{}",
        control_block("demo")
    );
    let config = EngineConfig::default();
    let parsed = parse_response(&raw, &config).unwrap();

    let originals: Snapshot = HashMap::new();
    let err = apply_operations(&parsed.operations, originals, &config).unwrap_err();
    assert!(matches!(err, ApplyError::SearchReplaceOnNewFile { .. }));
}
