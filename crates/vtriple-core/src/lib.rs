//! vtriple core - versioned triple-store diff and materialization kernel
//!
//! This crate provides:
//! - The snapshot data model (subjects, predicates, ordered value lists)
//! - The deterministic snapshot differ
//! - The interning boundary and an in-memory interner
//! - History log encoding and latest-view materialization
//! - The mutation pipeline and an in-memory backing store
//!
//! Storage backends implement [`intern::Interner`] and
//! [`pipeline::StatementExecutor`]; see `vtriple-store` for SQLite.

pub mod diff;
pub mod errors;
pub mod history;
pub mod intern;
pub mod latest;
pub mod logging_facility;
pub mod memory;
pub mod model;
pub mod pipeline;
pub mod statement;

#[doc(hidden)]
pub use vtriple_core_types as core_types;

// Re-export commonly used types
pub use diff::{compute_diff, diff_snapshots, DiffOperation, DiffType};
pub use errors::{Result, VtError, VtErrorKind};
pub use intern::{InternId, Interner, MemoryInterner};
pub use memory::MemoryStore;
pub use model::{Object, Snapshot, Value, Version};
pub use pipeline::{plan_mutations, run_pipeline, MutationPlan, PipelineReport, StatementExecutor};
