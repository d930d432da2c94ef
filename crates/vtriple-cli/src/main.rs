//! vtriple CLI
//!
//! Command-line interface for diffing snapshots and applying them to a
//! versioned triple store

use clap::{Parser, Subcommand, ValueEnum};
use vtriple_core::logging_facility::{init, Profile};

mod commands;
mod error;

#[derive(Debug, Parser)]
#[command(name = "vtriple")]
#[command(about = "vtriple - Versioned triple-store diff and materialization", long_about = None)]
struct Cli {
    /// Emit structured logs to stderr in this format
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Human,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Diff two snapshot files without touching a store
    Diff(commands::diff::DiffArgs),
    /// Apply the diff between two snapshot files as a new version
    Apply(commands::apply::ApplyArgs),
    /// Apply a snapshot file against the stored latest view
    Commit(commands::apply::CommitArgs),
    /// Print the current latest view as a snapshot
    Latest(commands::query::LatestArgs),
    /// Print the history log
    History(commands::query::HistoryArgs),
}

fn main() {
    let cli = Cli::parse();

    match cli.log_format {
        Some(LogFormat::Human) => init(Profile::Development),
        Some(LogFormat::Json) => init(Profile::Production),
        None => {}
    }

    let result = match cli.command {
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Apply(args) => commands::apply::execute_apply(args),
        Commands::Commit(args) => commands::apply::execute_commit(args),
        Commands::Latest(args) => commands::query::execute_latest(args),
        Commands::History(args) => commands::query::execute_history(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
