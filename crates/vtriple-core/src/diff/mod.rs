//! Snapshot diff engine.
//!
//! Compares two snapshots of a subject collection and produces the ordered
//! list of typed operations that transforms the old one into the new one.
//!
//! ## Entry point
//!
//! ```
//! use vtriple_core::diff::{diff_snapshots, DiffOperation};
//! use vtriple_core::model::{Object, Snapshot, Value};
//!
//! let old = Snapshot::new();
//! let new = Snapshot::from_objects([Object::new("s1").with("name", vec![Value::literal("Alice")])]).unwrap();
//! let ops = diff_snapshots(&old, &new);
//! assert_eq!(ops[0], DiffOperation::AddSubject { subject: "s1".into() });
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical operation sequences.
//! - **No-op idempotence**: diffing a snapshot against itself yields nothing.
//! - **Order sensitivity**: a value list that only changes order is replaced.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{compute_diff, compute_diff_json, diff_snapshots};
pub use human_summary::render_human_summary;
pub use model::{DiffOperation, DiffStats, DiffType, ValueOrder};
