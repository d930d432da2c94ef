//! Store-free diff command

use crate::commands::read_snapshot;
use crate::error::Result;
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use vtriple_engine::commands::apply::preview_diff;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Old snapshot (JSON array of objects)
    pub old: PathBuf,

    /// New snapshot (JSON array of objects)
    pub new: PathBuf,

    #[arg(long, value_enum, default_value = "json")]
    pub format: DiffFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DiffFormat {
    /// Operation list as JSON
    Json,
    /// Markdown summary
    Summary,
}

pub fn execute(args: DiffArgs) -> Result<()> {
    let old = read_snapshot(&args.old)?;
    let new = read_snapshot(&args.new)?;
    let preview = preview_diff(&old, &new);

    match args.format {
        DiffFormat::Json => println!("{}", serde_json::to_string_pretty(&preview.ops)?),
        DiffFormat::Summary => print!("{}", preview.summary),
    }

    Ok(())
}
