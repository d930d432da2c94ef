//! Diff operation types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq` so a
//! diff can be logged, compared in tests, and printed by the CLI.

use crate::model::Value;
use serde::{Deserialize, Serialize};

/// Positional order of a value within its predicate's list (1-based)
pub type ValueOrder = u32;

/// One typed change that moves the old snapshot toward the new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DiffOperation {
    /// Subject present only in the new snapshot
    AddSubject { subject: String },
    /// Subject present only in the old snapshot
    RemoveSubject { subject: String },
    /// New predicate that holds no values
    AddPredicate { subject: String, predicate: String },
    /// Predicate dropped from a subject present in both snapshots
    RemovePredicate { subject: String, predicate: String },
    /// One value of a newly added predicate
    AddTriple {
        subject: String,
        predicate: String,
        value: Value,
        order: ValueOrder,
    },
    /// Complete new value list of a predicate whose list changed; the list
    /// may be empty, meaning the predicate is now present with no values.
    ReplaceObjects {
        subject: String,
        predicate: String,
        values: Vec<Value>,
    },
}

/// Kind tag of a [`DiffOperation`], as recorded in the history log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffType {
    AddSubject,
    RemoveSubject,
    AddPredicate,
    RemovePredicate,
    AddTriple,
    ReplaceObjects,
}

impl DiffType {
    /// Stable string form stored in the history log
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffType::AddSubject => "add_subject",
            DiffType::RemoveSubject => "remove_subject",
            DiffType::AddPredicate => "add_predicate",
            DiffType::RemovePredicate => "remove_predicate",
            DiffType::AddTriple => "add_triple",
            DiffType::ReplaceObjects => "replace_objects",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "add_subject" => Some(DiffType::AddSubject),
            "remove_subject" => Some(DiffType::RemoveSubject),
            "add_predicate" => Some(DiffType::AddPredicate),
            "remove_predicate" => Some(DiffType::RemovePredicate),
            "add_triple" => Some(DiffType::AddTriple),
            "replace_objects" => Some(DiffType::ReplaceObjects),
            _ => None,
        }
    }
}

impl std::fmt::Display for DiffType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DiffOperation {
    pub fn diff_type(&self) -> DiffType {
        match self {
            DiffOperation::AddSubject { .. } => DiffType::AddSubject,
            DiffOperation::RemoveSubject { .. } => DiffType::RemoveSubject,
            DiffOperation::AddPredicate { .. } => DiffType::AddPredicate,
            DiffOperation::RemovePredicate { .. } => DiffType::RemovePredicate,
            DiffOperation::AddTriple { .. } => DiffType::AddTriple,
            DiffOperation::ReplaceObjects { .. } => DiffType::ReplaceObjects,
        }
    }

    pub fn subject(&self) -> &str {
        match self {
            DiffOperation::AddSubject { subject }
            | DiffOperation::RemoveSubject { subject }
            | DiffOperation::AddPredicate { subject, .. }
            | DiffOperation::RemovePredicate { subject, .. }
            | DiffOperation::AddTriple { subject, .. }
            | DiffOperation::ReplaceObjects { subject, .. } => subject,
        }
    }

    /// Predicate touched by the operation; `None` for subject-level operations
    pub fn predicate(&self) -> Option<&str> {
        match self {
            DiffOperation::AddSubject { .. } | DiffOperation::RemoveSubject { .. } => None,
            DiffOperation::AddPredicate { predicate, .. }
            | DiffOperation::RemovePredicate { predicate, .. }
            | DiffOperation::AddTriple { predicate, .. }
            | DiffOperation::ReplaceObjects { predicate, .. } => Some(predicate),
        }
    }
}

/// Per-kind operation counts for a diff run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub add_subject: usize,
    pub remove_subject: usize,
    pub add_predicate: usize,
    pub remove_predicate: usize,
    pub add_triple: usize,
    pub replace_objects: usize,
}

impl DiffStats {
    pub fn from_ops(ops: &[DiffOperation]) -> Self {
        let mut stats = DiffStats::default();
        for op in ops {
            match op.diff_type() {
                DiffType::AddSubject => stats.add_subject += 1,
                DiffType::RemoveSubject => stats.remove_subject += 1,
                DiffType::AddPredicate => stats.add_predicate += 1,
                DiffType::RemovePredicate => stats.remove_predicate += 1,
                DiffType::AddTriple => stats.add_triple += 1,
                DiffType::ReplaceObjects => stats.replace_objects += 1,
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.add_subject
            + self.remove_subject
            + self.add_predicate
            + self.remove_predicate
            + self.add_triple
            + self.replace_objects
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
