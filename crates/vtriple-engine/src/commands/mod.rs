//! Command orchestration layer.
//!
//! Provides high-level command functions that coordinate between
//! core domain logic and persistence layer.

pub mod apply;
pub mod engine_command;
