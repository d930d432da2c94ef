//! Apply and commit commands

use crate::commands::{open_db, read_snapshot};
use crate::error::Result;
use clap::Args;
use std::path::{Path, PathBuf};
use vtriple_engine::commands::apply::{ApplyOptions, ApplyOutcome};
use vtriple_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};

#[derive(Debug, Args)]
pub struct ApplyArgs {
    #[arg(long, default_value = ".vtriple/store.db")]
    pub db: PathBuf,

    /// Version number recorded in the history log
    #[arg(long)]
    pub version: i64,

    #[arg(long)]
    pub dry_run: bool,

    pub old: PathBuf,

    pub new: PathBuf,
}

#[derive(Debug, Args)]
pub struct CommitArgs {
    #[arg(long, default_value = ".vtriple/store.db")]
    pub db: PathBuf,

    /// Version number recorded in the history log
    #[arg(long)]
    pub version: i64,

    #[arg(long)]
    pub dry_run: bool,

    pub new: PathBuf,
}

pub fn execute_apply(args: ApplyArgs) -> Result<()> {
    let cmd = EngineCommand::Apply {
        old: read_snapshot(&args.old)?,
        new: read_snapshot(&args.new)?,
        version: args.version,
        options: options(args.dry_run),
    };
    run(cmd, &args.db)
}

pub fn execute_commit(args: CommitArgs) -> Result<()> {
    let cmd = EngineCommand::Commit {
        new: read_snapshot(&args.new)?,
        version: args.version,
        options: options(args.dry_run),
    };
    run(cmd, &args.db)
}

fn options(dry_run: bool) -> ApplyOptions {
    ApplyOptions {
        dry_run,
        ..ApplyOptions::default()
    }
}

fn run(cmd: EngineCommand, db: &Path) -> Result<()> {
    let mut conn = open_db(db)?;
    if let EngineCommandResult::Applied(outcome) = apply_engine_command(cmd, &mut conn)? {
        print_outcome(&outcome);
    }
    Ok(())
}

fn print_outcome(outcome: &ApplyOutcome) {
    if outcome.dry_run {
        println!("Dry run (no writes):");
    } else {
        println!("Version applied:");
    }
    println!("  version: {}", outcome.version);
    println!("  operations: {}", outcome.ops.len());
    println!("  history_rows: {}", outcome.history_rows);
    println!("  latest_deletes: {}", outcome.latest_deletes);
    println!("  latest_inserts: {}", outcome.latest_inserts);
    if !outcome.dry_run {
        println!("  statements_executed: {}", outcome.statements_executed);
    }
}
