//! Units of work produced by a diff run.
//!
//! The history encoder and latest-view materializer turn diff operations into
//! [`Statement`]s carrying interned ids; a `StatementExecutor` applies them to
//! a backing store one at a time.

use crate::diff::{DiffType, ValueOrder};
use crate::intern::InternId;
use crate::model::Version;
use serde::{Deserialize, Serialize};

/// Ordinal assigned to latest-view rows within one insertion phase
pub type LatestOrder = i64;

/// Immutable history log row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub version: Version,
    pub diff_type: DiffType,
    pub subject: InternId,
    pub predicate: Option<InternId>,
    pub object: Option<InternId>,
    pub order: Option<ValueOrder>,
}

/// Latest-view row: an interned triple and its insertion ordinal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestRow {
    pub triple: InternId,
    pub order: LatestOrder,
}

/// Bare-subject marker row plus the latest-subjects entry that guards it.
///
/// Executors insert `row` only when `subject` was not already known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectMarker {
    pub subject: InternId,
    pub row: LatestRow,
}

/// Which of the three ordered pipeline phases a statement belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    History,
    LatestDelete,
    LatestInsert,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::History => "history_append",
            Phase::LatestDelete => "latest_delete",
            Phase::LatestInsert => "latest_insert",
        }
    }
}

/// A single unit of work against the backing store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Multi-row append to the history log, rows kept in order
    AppendHistory { rows: Vec<HistoryRow> },
    /// Drop every latest row of a subject and its latest-subjects entry
    DeleteSubject { subject: InternId, label: String },
    /// Drop every latest row of a `(subject, predicate)` pair
    DeletePredicate {
        subject: InternId,
        predicate: InternId,
        cause: DiffType,
        subject_label: String,
        predicate_label: String,
    },
    /// Multi-row insert into the latest view
    InsertLatest { rows: Vec<LatestRow> },
    /// Register new subjects, inserting each marker row only for subjects
    /// the store did not already know
    InsertSubjectMarkers { markers: Vec<SubjectMarker> },
}

/// Diagnostic context attached to a failed statement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementContext {
    pub diff_type: Option<DiffType>,
    pub subject: Option<String>,
    pub predicate: Option<String>,
}

impl Statement {
    pub fn phase(&self) -> Phase {
        match self {
            Statement::AppendHistory { .. } => Phase::History,
            Statement::DeleteSubject { .. } | Statement::DeletePredicate { .. } => {
                Phase::LatestDelete
            }
            Statement::InsertLatest { .. } | Statement::InsertSubjectMarkers { .. } => {
                Phase::LatestInsert
            }
        }
    }

    /// Number of rows the statement writes (deletes count as one)
    pub fn row_count(&self) -> usize {
        match self {
            Statement::AppendHistory { rows } => rows.len(),
            Statement::InsertLatest { rows } => rows.len(),
            Statement::InsertSubjectMarkers { markers } => markers.len(),
            Statement::DeleteSubject { .. } | Statement::DeletePredicate { .. } => 1,
        }
    }

    pub fn context(&self) -> StatementContext {
        match self {
            Statement::DeleteSubject { label, .. } => StatementContext {
                diff_type: Some(DiffType::RemoveSubject),
                subject: Some(label.clone()),
                predicate: None,
            },
            Statement::DeletePredicate {
                cause,
                subject_label,
                predicate_label,
                ..
            } => StatementContext {
                diff_type: Some(*cause),
                subject: Some(subject_label.clone()),
                predicate: Some(predicate_label.clone()),
            },
            Statement::InsertSubjectMarkers { .. } => StatementContext {
                diff_type: Some(DiffType::AddSubject),
                ..StatementContext::default()
            },
            Statement::AppendHistory { .. } | Statement::InsertLatest { .. } => {
                StatementContext::default()
            }
        }
    }
}
