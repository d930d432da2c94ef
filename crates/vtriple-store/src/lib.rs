//! vtriple Store - SQLite backing store for the diff pipeline
//!
//! Provides:
//! - SQLite schema with an embedded, checksummed migrations framework
//! - Get-or-create interning of strings, objects and triples
//! - Statement execution for the history log and latest view
//! - Read paths for the latest view and the history log

pub mod db;
pub mod errors;
pub mod executor;
pub mod interner;
pub mod migrations;
pub mod query;

// Re-export key types
pub use errors::Result;
pub use executor::SqliteExecutor;
pub use interner::SqliteInterner;
