#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::json;
use vtriple_core::diff::{compute_diff, DiffOperation};
use vtriple_core::errors::VtErrorKind;
use vtriple_core::model::{Object, Snapshot, Value};
use vtriple_core::MemoryStore;

#[test]
fn test_malformed_json_is_invalid_input() {
    let err = compute_diff(b"[", b"[]").unwrap_err();
    assert_eq!(err.kind(), VtErrorKind::InvalidInput);
    assert_eq!(err.code(), "ERR_INVALID_INPUT");
}

#[test]
fn test_duplicate_id_is_invalid_input() {
    let err = Snapshot::from_json(&json!([{ "@id": "s1" }, { "@id": "s1" }])).unwrap_err();
    assert_eq!(err.kind(), VtErrorKind::InvalidInput);
    assert_eq!(err.subject(), Some("s1"));
}

#[test]
fn test_value_node_without_value_or_id_names_predicate() {
    let err = Snapshot::from_json(&json!([{ "@id": "s1", "p": [{ "@language": "en" }] }]))
        .unwrap_err();
    assert_eq!(err.kind(), VtErrorKind::InvalidInput);
    assert_eq!(err.subject(), Some("s1"));
    assert_eq!(err.predicate(), Some("p"));
}

#[test]
fn test_partial_application_reports_applied_count() {
    let old = Snapshot::from_objects([Object::new("s1").with("x", vec![Value::literal("1")])])
        .unwrap();
    let mut store = MemoryStore::seeded(&old).unwrap();
    store.fail_on_statement(2);

    let ops = vec![DiffOperation::ReplaceObjects {
        subject: "s1".into(),
        predicate: "x".into(),
        values: vec![Value::literal("2")],
    }];
    let err = store.apply(&ops, 1).unwrap_err();

    assert_eq!(err.kind(), VtErrorKind::PartialApplication);
    assert_eq!(err.statements_applied(), Some(2));
    assert_eq!(err.op(), Some("latest_insert"));
    let rendered = err.to_string();
    assert!(rendered.starts_with("[ERR_PARTIAL_APPLICATION] in operation 'latest_insert'"));
    assert!(rendered.contains("<- [ERR_STORAGE_UNAVAILABLE]"));
}
