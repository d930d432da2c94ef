//! In-memory backing store.
//!
//! Holds the interning tables, the history log and the latest view in plain
//! collections. Statements apply immediately with no transaction around
//! them, so a failed run leaves whatever it had already applied in place.

use crate::diff::{diff_snapshots, DiffOperation};
use crate::errors::{Result, VtError, VtErrorKind};
use crate::intern::{InternId, Interner, MemoryInterner, ObjectTuple, TripleKey};
use crate::latest::{reconstruct_snapshot, ResolvedLatestRow};
use crate::model::{Snapshot, Version};
use crate::pipeline::{plan_mutations, run_pipeline, PipelineReport, StatementExecutor};
use crate::statement::{HistoryRow, LatestRow, Statement};
use std::collections::BTreeSet;

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    interner: MemoryInterner,
    history: Vec<HistoryRow>,
    latest: Vec<LatestRow>,
    subjects: BTreeSet<InternId>,
    attempted: usize,
    fail_on: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose latest view holds `snapshot`, written as version 0
    pub fn seeded(snapshot: &Snapshot) -> Result<Self> {
        let mut store = Self::new();
        store.apply(&diff_snapshots(&Snapshot::new(), snapshot), 0)?;
        Ok(store)
    }

    /// Make the `index`-th statement executed from now on (0-based) fail
    /// with `StorageUnavailable`
    pub fn fail_on_statement(&mut self, index: usize) {
        self.fail_on = Some(self.attempted + index);
    }

    /// Plan `ops` against this store's interner and run the pipeline
    pub fn apply(&mut self, ops: &[DiffOperation], version: Version) -> Result<PipelineReport> {
        let plan = plan_mutations(ops, version, &mut self.interner)?;
        run_pipeline(self, &plan)
    }

    pub fn interner(&self) -> &MemoryInterner {
        &self.interner
    }

    pub fn history(&self) -> &[HistoryRow] {
        &self.history
    }

    pub fn history_for(&self, version: Version) -> Vec<HistoryRow> {
        self.history
            .iter()
            .filter(|row| row.version == version)
            .copied()
            .collect()
    }

    pub fn latest_rows(&self) -> &[LatestRow] {
        &self.latest
    }

    pub fn has_subject(&self, subject: &str) -> bool {
        self.interner
            .lookup_string(subject)
            .is_some_and(|id| self.subjects.contains(&id))
    }

    /// Rebuild the current state from the latest view
    pub fn latest_snapshot(&self) -> Result<Snapshot> {
        let subjects = self
            .subjects
            .iter()
            .map(|id| self.resolve_string(*id))
            .collect::<Result<Vec<_>>>()?;
        let rows = self
            .latest
            .iter()
            .map(|row| self.resolve_row(row))
            .collect::<Result<Vec<_>>>()?;
        reconstruct_snapshot(subjects, rows)
    }

    fn resolve_string(&self, id: InternId) -> Result<String> {
        self.interner
            .string(id)
            .map(str::to_string)
            .ok_or_else(|| dangling("string", id))
    }

    fn resolve_row(&self, row: &LatestRow) -> Result<ResolvedLatestRow> {
        let key = self
            .interner
            .triple(row.triple)
            .ok_or_else(|| dangling("triple", row.triple))?;
        let value = key
            .object
            .map(|id| {
                self.interner
                    .object(id)
                    .map(ObjectTuple::to_value)
                    .ok_or_else(|| dangling("object", id))
            })
            .transpose()?;
        Ok(ResolvedLatestRow {
            subject: self.resolve_string(key.subject)?,
            predicate: key.predicate.map(|p| self.resolve_string(p)).transpose()?,
            value,
            order: row.order,
        })
    }

    fn triple_key(&self, row: &LatestRow) -> Option<TripleKey> {
        self.interner.triple(row.triple)
    }
}

fn dangling(table: &str, id: InternId) -> VtError {
    VtError::new(VtErrorKind::Internal)
        .with_op("latest_snapshot")
        .with_message(format!("latest view references unknown {} id {}", table, id))
}

impl Interner for MemoryStore {
    fn intern_string(&mut self, s: &str) -> Result<InternId> {
        self.interner.intern_string(s)
    }

    fn intern_object(&mut self, object: &ObjectTuple) -> Result<InternId> {
        self.interner.intern_object(object)
    }

    fn intern_triple(&mut self, key: TripleKey) -> Result<InternId> {
        self.interner.intern_triple(key)
    }
}

impl StatementExecutor for MemoryStore {
    fn execute(&mut self, statement: &Statement) -> Result<usize> {
        let index = self.attempted;
        self.attempted += 1;
        if self.fail_on == Some(index) {
            return Err(VtError::new(VtErrorKind::StorageUnavailable)
                .with_message(format!("injected failure on statement {}", index)));
        }

        let affected = match statement {
            Statement::AppendHistory { rows } => {
                self.history.extend_from_slice(rows);
                rows.len()
            }
            Statement::DeleteSubject { subject, .. } => {
                self.subjects.remove(subject);
                self.delete_where(|key| key.subject == *subject)
            }
            Statement::DeletePredicate {
                subject, predicate, ..
            } => self.delete_where(|key| key.subject == *subject && key.predicate == Some(*predicate)),
            Statement::InsertLatest { rows } => {
                self.latest.extend_from_slice(rows);
                rows.len()
            }
            Statement::InsertSubjectMarkers { markers } => {
                let mut inserted = 0;
                for marker in markers {
                    if self.subjects.insert(marker.subject) {
                        self.latest.push(marker.row);
                        inserted += 1;
                    }
                }
                inserted
            }
        };
        Ok(affected)
    }
}

impl MemoryStore {
    fn delete_where(&mut self, matches: impl Fn(&TripleKey) -> bool) -> usize {
        let before = self.latest.len();
        let keep: Vec<LatestRow> = self
            .latest
            .iter()
            .filter(|row| !self.triple_key(row).is_some_and(|key| matches(&key)))
            .copied()
            .collect();
        self.latest = keep;
        before - self.latest.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Object, Value};

    fn snapshot(objects: Vec<Object>) -> Snapshot {
        Snapshot::from_objects(objects).unwrap()
    }

    #[test]
    fn test_seeded_store_reads_back_snapshot() {
        let seed = snapshot(vec![
            Object::new("s1").with("name", vec![Value::literal("Alice")]),
            Object::new("s2"),
        ]);
        let store = MemoryStore::seeded(&seed).unwrap();
        assert_eq!(store.latest_snapshot().unwrap(), seed);
        assert!(store.has_subject("s2"));
        assert!(!store.has_subject("s3"));
    }

    #[test]
    fn test_remove_subject_clears_rows_and_entry() {
        let seed = snapshot(vec![Object::new("s1").with("name", vec![Value::literal("A")])]);
        let mut store = MemoryStore::seeded(&seed).unwrap();
        let ops = diff_snapshots(&seed, &Snapshot::new());
        store.apply(&ops, 1).unwrap();

        assert!(store.latest_rows().is_empty());
        assert!(!store.has_subject("s1"));
        assert_eq!(store.history_for(1).len(), 1);
    }

    #[test]
    fn test_known_subject_gets_no_second_marker() {
        let seed = snapshot(vec![Object::new("s1")]);
        let mut store = MemoryStore::seeded(&seed).unwrap();
        let rows_before = store.latest_rows().len();

        let ops = vec![DiffOperation::AddSubject {
            subject: "s1".into(),
        }];
        let report = store.apply(&ops, 1).unwrap();
        assert_eq!(store.latest_rows().len(), rows_before);
        // history append ran, the marker insert touched nothing
        assert_eq!(report.rows_affected, 1);
    }

    #[test]
    fn test_injected_failure_leaves_earlier_statements_applied() {
        let old = snapshot(vec![Object::new("s1").with("x", vec![Value::literal("1")])]);
        let new = snapshot(vec![Object::new("s1").with("x", vec![Value::literal("2")])]);
        let mut store = MemoryStore::seeded(&old).unwrap();
        store.fail_on_statement(1);

        let err = store.apply(&diff_snapshots(&old, &new), 1).unwrap_err();
        assert_eq!(err.kind(), VtErrorKind::PartialApplication);
        assert_eq!(store.history_for(1).len(), 1);
        // the delete never ran
        assert_eq!(store.latest_snapshot().unwrap(), old);
    }
}
