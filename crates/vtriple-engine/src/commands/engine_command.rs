//! Engine-level commands for I/O operations.

#![allow(clippy::result_large_err)]

use crate::commands::apply::{apply_version, commit_version, ApplyOptions, ApplyOutcome};
use rusqlite::Connection;
use vtriple_core::model::{Snapshot, Version};
use vtriple_store::errors::Result;
use vtriple_store::query::{load_history, load_latest, HistoryEntry};

/// Engine-level commands that require a database.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Apply the diff between two supplied snapshots.
    Apply {
        old: Snapshot,
        new: Snapshot,
        version: Version,
        options: ApplyOptions,
    },
    /// Apply a snapshot against the stored latest view.
    Commit {
        new: Snapshot,
        version: Version,
        options: ApplyOptions,
    },
    /// Read the current latest view.
    Latest,
    /// Read the history log, optionally for one version.
    History { version: Option<Version> },
}

/// Result of applying an engine command.
#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    Applied(ApplyOutcome),
    Latest(Snapshot),
    History(Vec<HistoryEntry>),
}

/// Apply an engine command.
///
/// # Errors
///
/// Propagates the underlying command's error.
pub fn apply_engine_command(
    cmd: EngineCommand,
    conn: &mut Connection,
) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::Apply {
            old,
            new,
            version,
            options,
        } => apply_version(conn, &old, &new, version, &options).map(EngineCommandResult::Applied),
        EngineCommand::Commit {
            new,
            version,
            options,
        } => commit_version(conn, &new, version, &options).map(EngineCommandResult::Applied),
        EngineCommand::Latest => load_latest(conn).map(EngineCommandResult::Latest),
        EngineCommand::History { version } => {
            load_history(conn, version).map(EngineCommandResult::History)
        }
    }
}
