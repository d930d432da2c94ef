//! History log encoding.
//!
//! Every diff operation becomes history rows tagged with the run's version.
//! The log is append-only: rows are never updated or deleted.

use crate::diff::{DiffOperation, ValueOrder};
use crate::errors::{Result, VtError};
use crate::intern::{InternId, Interner};
use crate::model::{Value, Version};
use crate::statement::{HistoryRow, Statement};

/// Encode diff operations as history rows.
///
/// - `AddTriple` → one row with its value and positional order.
/// - `ReplaceObjects` → one row per new value with positional order, or a
///   single null-object row when the new list is empty.
/// - `AddSubject`, `RemoveSubject`, `AddPredicate`, `RemovePredicate` → one
///   row with null object and order.
///
/// # Errors
///
/// Propagates the interner's failure, annotated with the offending
/// operation's diff type, subject and predicate.
pub fn encode_history<I: Interner + ?Sized>(
    ops: &[DiffOperation],
    version: Version,
    interner: &mut I,
) -> Result<Vec<HistoryRow>> {
    let mut rows = Vec::with_capacity(ops.len());
    for op in ops {
        encode_op(op, version, interner, &mut rows).map_err(|e| annotate(e, op))?;
    }
    Ok(rows)
}

/// Batch history rows into one append statement; `None` when there is nothing to append
pub fn history_statement(rows: Vec<HistoryRow>) -> Option<Statement> {
    if rows.is_empty() {
        None
    } else {
        Some(Statement::AppendHistory { rows })
    }
}

fn encode_op<I: Interner + ?Sized>(
    op: &DiffOperation,
    version: Version,
    interner: &mut I,
    rows: &mut Vec<HistoryRow>,
) -> Result<()> {
    let diff_type = op.diff_type();
    let subject = interner.intern_string(op.subject())?;
    let predicate = op
        .predicate()
        .map(|p| interner.intern_string(p))
        .transpose()?;

    let mut push = |object: Option<InternId>, order: Option<ValueOrder>| {
        rows.push(HistoryRow {
            version,
            diff_type,
            subject,
            predicate,
            object,
            order,
        })
    };

    match op {
        DiffOperation::AddTriple { value, order, .. } => {
            let object = interner.intern_value(value)?;
            push(Some(object), Some(*order));
        }
        DiffOperation::ReplaceObjects { values, .. } if values.is_empty() => push(None, None),
        DiffOperation::ReplaceObjects { values, .. } => {
            for (object, order) in intern_values(values, interner)? {
                push(Some(object), Some(order));
            }
        }
        DiffOperation::AddSubject { .. }
        | DiffOperation::RemoveSubject { .. }
        | DiffOperation::AddPredicate { .. }
        | DiffOperation::RemovePredicate { .. } => push(None, None),
    }

    Ok(())
}

fn intern_values<I: Interner + ?Sized>(
    values: &[Value],
    interner: &mut I,
) -> Result<Vec<(InternId, ValueOrder)>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| Ok((interner.intern_value(value)?, index as ValueOrder + 1)))
        .collect()
}

pub(crate) fn annotate(err: VtError, op: &DiffOperation) -> VtError {
    let err = err
        .with_diff_type(op.diff_type().as_str())
        .with_subject(op.subject());
    match op.predicate() {
        Some(predicate) => err.with_predicate(predicate),
        None => err,
    }
}

/// Count of rows [`encode_history`] emits for `ops`, without interning
pub fn history_row_count(ops: &[DiffOperation]) -> usize {
    ops.iter()
        .map(|op| match op {
            DiffOperation::ReplaceObjects { values, .. } => values.len().max(1),
            _ => 1,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffType;
    use crate::errors::VtErrorKind;
    use crate::intern::{MemoryInterner, ObjectTuple, TripleKey};

    fn ops() -> Vec<DiffOperation> {
        vec![
            DiffOperation::AddSubject {
                subject: "s1".into(),
            },
            DiffOperation::AddTriple {
                subject: "s1".into(),
                predicate: "name".into(),
                value: Value::literal("Alice"),
                order: 1,
            },
            DiffOperation::ReplaceObjects {
                subject: "s2".into(),
                predicate: "tag".into(),
                values: vec![Value::literal("b"), Value::literal("a")],
            },
            DiffOperation::ReplaceObjects {
                subject: "s2".into(),
                predicate: "gone".into(),
                values: vec![],
            },
            DiffOperation::RemoveSubject {
                subject: "s3".into(),
            },
        ]
    }

    #[test]
    fn test_rows_follow_operation_order() {
        let mut interner = MemoryInterner::new();
        let rows = encode_history(&ops(), 7, &mut interner).unwrap();

        let types: Vec<DiffType> = rows.iter().map(|r| r.diff_type).collect();
        assert_eq!(
            types,
            vec![
                DiffType::AddSubject,
                DiffType::AddTriple,
                DiffType::ReplaceObjects,
                DiffType::ReplaceObjects,
                DiffType::ReplaceObjects,
                DiffType::RemoveSubject,
            ]
        );
        assert!(rows.iter().all(|r| r.version == 7));
        assert_eq!(rows.len(), history_row_count(&ops()));
    }

    #[test]
    fn test_subject_rows_have_no_predicate_or_value() {
        let mut interner = MemoryInterner::new();
        let rows = encode_history(&ops(), 1, &mut interner).unwrap();

        let add_subject = rows[0];
        assert_eq!(add_subject.predicate, None);
        assert_eq!(add_subject.object, None);
        assert_eq!(add_subject.order, None);
        assert_eq!(interner.string(add_subject.subject), Some("s1"));
    }

    #[test]
    fn test_replace_rows_carry_positional_order() {
        let mut interner = MemoryInterner::new();
        let rows = encode_history(&ops(), 1, &mut interner).unwrap();

        let replace: Vec<&HistoryRow> = rows
            .iter()
            .filter(|r| r.diff_type == DiffType::ReplaceObjects)
            .collect();
        assert_eq!(replace[0].order, Some(1));
        assert_eq!(
            interner.object(replace[0].object.unwrap()),
            Some(&ObjectTuple::from(&Value::literal("b")))
        );
        assert_eq!(replace[1].order, Some(2));
        // Empty replacement leaves a single marker row.
        assert_eq!(replace[2].object, None);
        assert_eq!(replace[2].order, None);
    }

    struct BrokenInterner;

    impl Interner for BrokenInterner {
        fn intern_string(&mut self, _s: &str) -> Result<InternId> {
            Ok(1)
        }

        fn intern_object(&mut self, _object: &ObjectTuple) -> Result<InternId> {
            Err(VtError::new(VtErrorKind::StorageUnavailable).with_message("objects offline"))
        }

        fn intern_triple(&mut self, _key: TripleKey) -> Result<InternId> {
            Ok(1)
        }
    }

    #[test]
    fn test_interner_failure_carries_operation_context() {
        let err = encode_history(&ops(), 1, &mut BrokenInterner).unwrap_err();
        assert_eq!(err.kind(), VtErrorKind::StorageUnavailable);
        assert_eq!(err.diff_type(), Some("add_triple"));
        assert_eq!(err.subject(), Some("s1"));
        assert_eq!(err.predicate(), Some("name"));
    }

    #[test]
    fn test_empty_ops_produce_no_statement() {
        assert!(history_statement(vec![]).is_none());
    }
}
