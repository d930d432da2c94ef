//! Snapshot diff computation engine.
//!
//! The core entry point is [`diff_snapshots`], which compares two parsed
//! snapshots. [`compute_diff`] and [`compute_diff_json`] parse raw input first.

use crate::diff::model::DiffOperation;
use crate::errors::Result;
use crate::model::{is_reserved_key, Object, Snapshot, Value};
use serde_json::Value as Json;
use std::collections::{BTreeMap, BTreeSet};

/// Compute the ordered list of operations that turns `old` into `new`.
///
/// Subjects are visited in ascending id order, predicates in ascending name
/// order, and subjects only present in `old` are removed last (again in id
/// order), so identical inputs always yield identical output.
pub fn diff_snapshots(old: &Snapshot, new: &Snapshot) -> Vec<DiffOperation> {
    // Whatever is still here after the walk over `new` was removed.
    let mut unmatched: BTreeMap<&str, &Object> = old.iter().map(|o| (o.id(), o)).collect();
    let mut ops = Vec::new();

    for object in new.iter() {
        match unmatched.remove(object.id()) {
            None => push_new_subject(object, &mut ops),
            Some(previous) => push_subject_changes(previous, object, &mut ops),
        }
    }

    for subject in unmatched.into_keys() {
        ops.push(DiffOperation::RemoveSubject {
            subject: subject.to_string(),
        });
    }

    ops
}

/// Parse two snapshots from JSON bytes and diff them.
///
/// # Errors
///
/// - `InvalidInput`: either side is not valid JSON, is `null`, or is not a
///   well-formed snapshot
pub fn compute_diff(old_bytes: &[u8], new_bytes: &[u8]) -> Result<Vec<DiffOperation>> {
    let old = Snapshot::from_slice(old_bytes)?;
    let new = Snapshot::from_slice(new_bytes)?;
    Ok(diff_snapshots(&old, &new))
}

/// Parse two snapshots from JSON values and diff them.
///
/// # Errors
///
/// - `InvalidInput`: either side is `null` or not a well-formed snapshot
pub fn compute_diff_json(old: &Json, new: &Json) -> Result<Vec<DiffOperation>> {
    let old = Snapshot::from_json(old)?;
    let new = Snapshot::from_json(new)?;
    Ok(diff_snapshots(&old, &new))
}

fn push_new_subject(object: &Object, ops: &mut Vec<DiffOperation>) {
    ops.push(DiffOperation::AddSubject {
        subject: object.id().to_string(),
    });
    for (predicate, values) in object.predicates() {
        if is_reserved_key(predicate) {
            continue;
        }
        push_added_predicate(object.id(), predicate, values, ops);
    }
}

fn push_subject_changes(previous: &Object, current: &Object, ops: &mut Vec<DiffOperation>) {
    let names: BTreeSet<&str> = previous
        .predicates()
        .chain(current.predicates())
        .map(|(p, _)| p)
        .filter(|p| !is_reserved_key(p))
        .collect();

    for predicate in names {
        match (previous.values(predicate), current.values(predicate)) {
            (Some(_), None) => ops.push(DiffOperation::RemovePredicate {
                subject: current.id().to_string(),
                predicate: predicate.to_string(),
            }),
            (None, Some(values)) => push_added_predicate(current.id(), predicate, values, ops),
            // Order is significant: a reordering is a change.
            (Some(before), Some(after)) if before != after => {
                ops.push(DiffOperation::ReplaceObjects {
                    subject: current.id().to_string(),
                    predicate: predicate.to_string(),
                    values: after.to_vec(),
                })
            }
            _ => {}
        }
    }
}

fn push_added_predicate(
    subject: &str,
    predicate: &str,
    values: &[Value],
    ops: &mut Vec<DiffOperation>,
) {
    if values.is_empty() {
        ops.push(DiffOperation::AddPredicate {
            subject: subject.to_string(),
            predicate: predicate.to_string(),
        });
        return;
    }

    for (index, value) in values.iter().enumerate() {
        ops.push(DiffOperation::AddTriple {
            subject: subject.to_string(),
            predicate: predicate.to_string(),
            value: value.clone(),
            order: index as u32 + 1,
        });
    }
}
