//! End-to-end tests for the vtriple binary

use serde_json::Value as Json;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn vtriple() -> Command {
    Command::new(env!("CARGO_BIN_EXE_vtriple"))
}

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

const V1: &str = r#"[{"@id": "s1", "name": [{"@value": "Alice"}], "age": [{"@value": "30"}]}]"#;
const V2: &str = r#"[
    {"@id": "s1", "name": [{"@value": "Alice"}], "age": [{"@value": "31"}]},
    {"@id": "s2", "name": [{"@value": "Bob"}]}
]"#;

#[test]
fn test_diff_json_lists_operations() {
    let dir = TempDir::new().unwrap();
    let old = write(dir.path(), "old.json", "[]");
    let new = write(dir.path(), "new.json", V1);

    let output = vtriple().arg("diff").arg(&old).arg(&new).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let ops: Json = serde_json::from_str(&stdout(&output)).unwrap();
    let ops = ops.as_array().unwrap();
    assert_eq!(ops.len(), 3);
    assert_eq!(ops[0]["op"], "add_subject");
    assert_eq!(ops[0]["subject"], "s1");
}

#[test]
fn test_diff_summary_format() {
    let dir = TempDir::new().unwrap();
    let old = write(dir.path(), "old.json", V1);
    let new = write(dir.path(), "new.json", V1);

    let output = vtriple()
        .args(["diff", "--format", "summary"])
        .arg(&old)
        .arg(&new)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("No changes detected"));
}

#[test]
fn test_invalid_snapshot_exits_with_input_error() {
    let dir = TempDir::new().unwrap();
    let old = write(dir.path(), "old.json", "null");
    let new = write(dir.path(), "new.json", V1);

    let output = vtriple().arg("diff").arg(&old).arg(&new).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Error:"));
}

#[test]
fn test_commit_then_latest_round_trips() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("nested").join("store.db");
    let v1 = write(dir.path(), "v1.json", V1);
    let v2 = write(dir.path(), "v2.json", V2);

    for (version, file) in [("1", &v1), ("2", &v2)] {
        let output = vtriple()
            .arg("commit")
            .arg("--db")
            .arg(&db)
            .args(["--version", version])
            .arg(file)
            .output()
            .unwrap();
        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(stdout(&output).contains("Version applied:"));
    }

    let output = vtriple().arg("latest").arg("--db").arg(&db).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let latest: Json = serde_json::from_str(&stdout(&output)).unwrap();
    let expected: Json = serde_json::from_str(V2).unwrap();
    assert_eq!(latest, expected);
}

#[test]
fn test_apply_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("store.db");
    let old = write(dir.path(), "old.json", "[]");
    let new = write(dir.path(), "new.json", V1);

    let output = vtriple()
        .arg("apply")
        .arg("--db")
        .arg(&db)
        .args(["--version", "1", "--dry-run"])
        .arg(&old)
        .arg(&new)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Dry run (no writes):"));

    let output = vtriple().arg("latest").arg("--db").arg(&db).output().unwrap();
    assert_eq!(stdout(&output).trim(), "[]");
}

#[test]
fn test_history_filters_by_version() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("store.db");
    let empty = write(dir.path(), "empty.json", "[]");
    let v1 = write(dir.path(), "v1.json", V1);
    let v2 = write(dir.path(), "v2.json", V2);

    for (version, old, new) in [("1", &empty, &v1), ("2", &v1, &v2)] {
        let output = vtriple()
            .arg("apply")
            .arg("--db")
            .arg(&db)
            .args(["--version", version])
            .arg(old)
            .arg(new)
            .output()
            .unwrap();
        assert!(output.status.success(), "stderr: {}", stderr(&output));
    }

    let output = vtriple()
        .arg("history")
        .arg("--db")
        .arg(&db)
        .args(["--version", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rows: Json = serde_json::from_str(&stdout(&output)).unwrap();
    let rows = rows.as_array().unwrap();
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|row| row["version"] == 2));
    assert!(rows.iter().any(|row| row["diff_type"] == "replace_objects"));
}

#[test]
fn test_json_logs_stay_off_stdout() {
    let dir = TempDir::new().unwrap();
    let old = write(dir.path(), "old.json", "[]");
    let new = write(dir.path(), "new.json", V1);

    let output = vtriple()
        .args(["--log-format", "json", "diff"])
        .arg(&old)
        .arg(&new)
        .output()
        .unwrap();
    assert!(output.status.success());
    let ops: Json = serde_json::from_str(&stdout(&output)).unwrap();
    assert!(ops.is_array());
}
