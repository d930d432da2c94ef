#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::json;
use vtriple_core::diff::DiffType;
use vtriple_core::model::Snapshot;
use vtriple_engine::commands::apply::ApplyOptions;
use vtriple_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};
use vtriple_store::db::open_store_in_memory;

#[test]
fn test_commands_share_one_connection() {
    let mut conn = open_store_in_memory().unwrap();
    let new = Snapshot::from_json(&json!([{ "@id": "s1", "p": [{ "@value": "v" }] }])).unwrap();

    let applied = apply_engine_command(
        EngineCommand::Commit {
            new: new.clone(),
            version: 1,
            options: ApplyOptions::default(),
        },
        &mut conn,
    )
    .unwrap();
    assert!(matches!(applied, EngineCommandResult::Applied(ref o) if o.ops.len() == 2));

    match apply_engine_command(EngineCommand::Latest, &mut conn).unwrap() {
        EngineCommandResult::Latest(snapshot) => assert_eq!(snapshot, new),
        other => panic!("expected latest view, got {other:?}"),
    }

    match apply_engine_command(EngineCommand::History { version: Some(1) }, &mut conn).unwrap() {
        EngineCommandResult::History(entries) => {
            let types: Vec<DiffType> = entries.iter().map(|e| e.diff_type).collect();
            assert_eq!(types, vec![DiffType::AddSubject, DiffType::AddTriple]);
        }
        other => panic!("expected history, got {other:?}"),
    }
}

#[test]
fn test_apply_command_uses_supplied_old_snapshot() {
    let mut conn = open_store_in_memory().unwrap();
    let old = Snapshot::from_json(&json!([{ "@id": "s1" }])).unwrap();

    let result = apply_engine_command(
        EngineCommand::Apply {
            old,
            new: Snapshot::new(),
            version: 3,
            options: ApplyOptions::default(),
        },
        &mut conn,
    )
    .unwrap();

    match result {
        EngineCommandResult::Applied(outcome) => {
            assert_eq!(outcome.stats.remove_subject, 1);
            assert_eq!(outcome.version, 3);
        }
        other => panic!("expected apply outcome, got {other:?}"),
    }
}
