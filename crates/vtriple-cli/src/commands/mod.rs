pub mod apply;
pub mod diff;
pub mod query;

use crate::error::{CliError, Result};
use rusqlite::Connection;
use std::path::Path;
use vtriple_core::model::Snapshot;

/// Read and parse a snapshot file
pub(crate) fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let bytes = std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Snapshot::from_slice(&bytes).map_err(|source| CliError::Snapshot {
        path: path.to_path_buf(),
        source,
    })
}

/// Open (creating if needed) and migrate the store at `db`
pub(crate) fn open_db(db: &Path) -> Result<Connection> {
    if let Some(parent) = db.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| CliError::DbDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(vtriple_store::db::open_store(db)?)
}
