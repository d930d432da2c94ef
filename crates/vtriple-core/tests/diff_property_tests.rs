#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Property tests over generated snapshots, checked against the in-memory store.

use proptest::collection::{btree_map, vec};
use proptest::prelude::*;
use vtriple_core::diff::{diff_snapshots, DiffOperation};
use vtriple_core::model::{Object, Snapshot, Value};
use vtriple_core::MemoryStore;

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-c]".prop_map(Value::literal),
        ("[a-c]", prop_oneof![Just("en"), Just("de")])
            .prop_map(|(text, lang)| Value::lang_literal(text, lang)),
        "[a-c]".prop_map(|text| Value::typed_literal(text, "xsd:string")),
        "s[0-4]".prop_map(Value::resource),
    ]
}

fn object_strategy(id: String) -> impl Strategy<Value = Object> {
    btree_map("p[0-3]", vec(value_strategy(), 0..4), 0..4).prop_map(move |predicates| {
        predicates
            .into_iter()
            .fold(Object::new(id.clone()), |object, (p, values)| {
                object.with(p, values)
            })
    })
}

fn snapshot_strategy() -> impl Strategy<Value = Snapshot> {
    proptest::sample::subsequence(vec!["s0", "s1", "s2", "s3", "s4"], 0..=5)
        .prop_flat_map(|ids| {
            ids.into_iter()
                .map(|id| object_strategy(id.to_string()))
                .collect::<Vec<_>>()
        })
        .prop_map(|objects| Snapshot::from_objects(objects).unwrap())
}

proptest! {
    #[test]
    fn prop_applying_diff_to_old_state_yields_new_state(
        old in snapshot_strategy(),
        new in snapshot_strategy(),
    ) {
        let mut store = MemoryStore::seeded(&old).unwrap();
        prop_assert_eq!(store.latest_snapshot().unwrap(), old.clone());

        store.apply(&diff_snapshots(&old, &new), 1).unwrap();
        prop_assert_eq!(store.latest_snapshot().unwrap(), new);
    }

    #[test]
    fn prop_diff_against_self_is_empty(snapshot in snapshot_strategy()) {
        prop_assert!(diff_snapshots(&snapshot, &snapshot).is_empty());
    }

    #[test]
    fn prop_diff_is_deterministic(
        old in snapshot_strategy(),
        new in snapshot_strategy(),
    ) {
        prop_assert_eq!(diff_snapshots(&old, &new), diff_snapshots(&old, &new));
    }

    #[test]
    fn prop_subject_ops_partition_ids(
        old in snapshot_strategy(),
        new in snapshot_strategy(),
    ) {
        for op in diff_snapshots(&old, &new) {
            match op {
                DiffOperation::AddSubject { subject } => {
                    prop_assert!(new.contains(&subject) && !old.contains(&subject));
                }
                DiffOperation::RemoveSubject { subject } => {
                    prop_assert!(old.contains(&subject) && !new.contains(&subject));
                }
                other => prop_assert!(new.contains(other.subject())),
            }
        }
    }
}
