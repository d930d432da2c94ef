//! Read-only store commands

use crate::commands::open_db;
use crate::error::Result;
use clap::Args;
use std::path::PathBuf;
use vtriple_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};

#[derive(Debug, Args)]
pub struct LatestArgs {
    #[arg(long, default_value = ".vtriple/store.db")]
    pub db: PathBuf,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    #[arg(long, default_value = ".vtriple/store.db")]
    pub db: PathBuf,

    /// Only rows written by this version
    #[arg(long)]
    pub version: Option<i64>,
}

pub fn execute_latest(args: LatestArgs) -> Result<()> {
    let mut conn = open_db(&args.db)?;
    if let EngineCommandResult::Latest(snapshot) =
        apply_engine_command(EngineCommand::Latest, &mut conn)?
    {
        println!("{}", serde_json::to_string_pretty(&snapshot.to_json())?);
    }
    Ok(())
}

pub fn execute_history(args: HistoryArgs) -> Result<()> {
    let mut conn = open_db(&args.db)?;
    let cmd = EngineCommand::History {
        version: args.version,
    };
    if let EngineCommandResult::History(entries) = apply_engine_command(cmd, &mut conn)? {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    }
    Ok(())
}
