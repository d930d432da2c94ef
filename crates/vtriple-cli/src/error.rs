//! CLI error type

use std::path::PathBuf;
use thiserror::Error;
use vtriple_core::errors::{VtError, VtErrorKind};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot prepare database directory {path}: {source}")]
    DbDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: VtError,
    },

    #[error(transparent)]
    Vt(#[from] VtError),

    #[error("cannot render output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// 2 for bad input, 1 for everything else
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Read { .. } | CliError::Snapshot { .. } => 2,
            CliError::Vt(err) if err.kind() == VtErrorKind::InvalidInput => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
