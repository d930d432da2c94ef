//! Latest-view materialization.
//!
//! The latest view is the current-state projection: one row per value (plus
//! marker rows for empty predicates and bare subjects) and a side set of
//! known subjects. Applying a diff is two-phase: every delete runs before any
//! insert, so clearing a predicate can never remove rows added by the same run.

use crate::diff::{DiffOperation, DiffType};
use crate::errors::Result;
use crate::history::annotate;
use crate::intern::{InternId, Interner};
use crate::model::{Object, Snapshot, Value};
use crate::statement::{LatestOrder, LatestRow, Statement, SubjectMarker};
use std::collections::{BTreeMap, BTreeSet};

/// First ordinal handed out by a fresh insertion phase
pub const FIRST_ORDER: LatestOrder = 1;

/// Delete and insert batches for one diff run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatestPlan {
    pub deletes: Vec<Statement>,
    pub rows: Vec<LatestRow>,
    pub subject_markers: Vec<SubjectMarker>,
    /// Ordinal the next insertion phase should start from
    pub next_order: LatestOrder,
}

impl LatestPlan {
    /// Split into (delete statements, insert statements)
    pub fn into_statements(self) -> (Vec<Statement>, Vec<Statement>) {
        let mut inserts = Vec::new();
        if !self.rows.is_empty() {
            inserts.push(Statement::InsertLatest { rows: self.rows });
        }
        if !self.subject_markers.is_empty() {
            inserts.push(Statement::InsertSubjectMarkers {
                markers: self.subject_markers,
            });
        }
        (self.deletes, inserts)
    }

    pub fn insert_count(&self) -> usize {
        self.rows.len() + self.subject_markers.len()
    }
}

/// Turn diff operations into latest-view statements.
///
/// Deletes: `RemoveSubject` clears the subject; `RemovePredicate` and
/// `ReplaceObjects` clear the `(subject, predicate)` pair.
///
/// Inserts run kind by kind: `ReplaceObjects` values (an empty list leaves a
/// predicate marker), then `AddSubject` markers (once per subject), then
/// `AddPredicate` markers, then `AddTriple` values. Every inserted row takes
/// the next ordinal starting at `first_order`; the ordinal after the last one
/// is returned in [`LatestPlan::next_order`].
///
/// # Errors
///
/// Propagates the interner's failure, annotated with the offending
/// operation's context.
pub fn materialize_latest<I: Interner + ?Sized>(
    ops: &[DiffOperation],
    interner: &mut I,
    first_order: LatestOrder,
) -> Result<LatestPlan> {
    let mut plan = LatestPlan {
        next_order: first_order,
        ..LatestPlan::default()
    };

    for kind in [
        DiffType::RemoveSubject,
        DiffType::RemovePredicate,
        DiffType::ReplaceObjects,
    ] {
        for op in ops.iter().filter(|op| op.diff_type() == kind) {
            let statement = delete_statement(op, interner).map_err(|e| annotate(e, op))?;
            plan.deletes.extend(statement);
        }
    }

    let mut order = first_order;
    let mut marked_subjects = BTreeSet::new();
    for kind in [
        DiffType::ReplaceObjects,
        DiffType::AddSubject,
        DiffType::AddPredicate,
        DiffType::AddTriple,
    ] {
        for op in ops.iter().filter(|op| op.diff_type() == kind) {
            queue_inserts(op, interner, &mut order, &mut marked_subjects, &mut plan)
                .map_err(|e| annotate(e, op))?;
        }
    }
    plan.next_order = order;

    Ok(plan)
}

fn delete_statement<I: Interner + ?Sized>(
    op: &DiffOperation,
    interner: &mut I,
) -> Result<Option<Statement>> {
    let statement = match op {
        DiffOperation::RemoveSubject { subject } => Some(Statement::DeleteSubject {
            subject: interner.intern_string(subject)?,
            label: subject.clone(),
        }),
        DiffOperation::RemovePredicate { subject, predicate }
        | DiffOperation::ReplaceObjects {
            subject, predicate, ..
        } => Some(Statement::DeletePredicate {
            subject: interner.intern_string(subject)?,
            predicate: interner.intern_string(predicate)?,
            cause: op.diff_type(),
            subject_label: subject.clone(),
            predicate_label: predicate.clone(),
        }),
        _ => None,
    };
    Ok(statement)
}

fn take(order: &mut LatestOrder) -> LatestOrder {
    let current = *order;
    *order += 1;
    current
}

fn queue_inserts<I: Interner + ?Sized>(
    op: &DiffOperation,
    interner: &mut I,
    order: &mut LatestOrder,
    marked_subjects: &mut BTreeSet<InternId>,
    plan: &mut LatestPlan,
) -> Result<()> {
    match op {
        DiffOperation::ReplaceObjects {
            subject,
            predicate,
            values,
        } => {
            if values.is_empty() {
                let triple = interner.intern_triple_parts(subject, Some(predicate), None)?;
                plan.rows.push(LatestRow {
                    triple,
                    order: take(order),
                });
            }
            for value in values {
                let triple = interner.intern_triple_parts(subject, Some(predicate), Some(value))?;
                plan.rows.push(LatestRow {
                    triple,
                    order: take(order),
                });
            }
        }
        DiffOperation::AddSubject { subject } => {
            let subject_id = interner.intern_string(subject)?;
            if marked_subjects.insert(subject_id) {
                let triple = interner.intern_triple_parts(subject, None, None)?;
                plan.subject_markers.push(SubjectMarker {
                    subject: subject_id,
                    row: LatestRow {
                        triple,
                        order: take(order),
                    },
                });
            }
        }
        DiffOperation::AddPredicate { subject, predicate } => {
            let triple = interner.intern_triple_parts(subject, Some(predicate), None)?;
            plan.rows.push(LatestRow {
                triple,
                order: take(order),
            });
        }
        DiffOperation::AddTriple {
            subject,
            predicate,
            value,
            ..
        } => {
            let triple = interner.intern_triple_parts(subject, Some(predicate), Some(value))?;
            plan.rows.push(LatestRow {
                triple,
                order: take(order),
            });
        }
        DiffOperation::RemoveSubject { .. } | DiffOperation::RemovePredicate { .. } => {}
    }
    Ok(())
}

/// A latest-view row with its interned parts resolved back to text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLatestRow {
    pub subject: String,
    pub predicate: Option<String>,
    pub value: Option<Value>,
    pub order: LatestOrder,
}

/// Rebuild a snapshot from the latest view.
///
/// Values of a predicate are ordered by their row ordinal. All rows of one
/// `(subject, predicate)` pair are written by a single run, so the ordinal
/// reproduces positional order even though counters restart every run.
/// Subjects listed in `subjects` appear even when they have no rows.
///
/// # Errors
///
/// `InvalidInput` if a row carries a value without a predicate.
pub fn reconstruct_snapshot(
    subjects: impl IntoIterator<Item = String>,
    mut rows: Vec<ResolvedLatestRow>,
) -> Result<Snapshot> {
    rows.sort_by(|a, b| {
        (&a.subject, &a.predicate, a.order).cmp(&(&b.subject, &b.predicate, b.order))
    });

    let mut objects: BTreeMap<String, Object> = subjects
        .into_iter()
        .map(|s| (s.clone(), Object::new(s)))
        .collect();

    for row in rows {
        let object = objects
            .entry(row.subject.clone())
            .or_insert_with(|| Object::new(row.subject.clone()));
        match (row.predicate, row.value) {
            (Some(predicate), Some(value)) => object.push(predicate, value),
            (Some(predicate), None) => {
                if !object.has_predicate(&predicate) {
                    object.set(predicate, Vec::new());
                }
            }
            (None, None) => {}
            (None, Some(_)) => {
                return Err(crate::errors::invalid_input(
                    "reconstruct_snapshot",
                    "latest row has a value but no predicate",
                )
                .with_subject(row.subject))
            }
        }
    }

    Snapshot::from_objects(objects.into_values())
}
