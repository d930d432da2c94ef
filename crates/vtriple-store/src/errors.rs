//! Error handling for vtriple-store
//!
//! Wraps vtriple-core VtError with store-specific helpers

use vtriple_core::errors::{VtError, VtErrorKind};

/// Result type alias using VtError
pub type Result<T> = std::result::Result<T, VtError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> VtError {
    VtError::new(VtErrorKind::Migration)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> VtError {
    VtError::new(VtErrorKind::Migration)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a storage error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> VtError {
    VtError::new(VtErrorKind::StorageUnavailable)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an error for a stored row that no longer decodes
pub fn corrupt_row(op: &str, reason: impl Into<String>) -> VtError {
    VtError::new(VtErrorKind::Internal)
        .with_op(op)
        .with_message(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rusqlite_errors_are_storage_unavailable() {
        let err = from_rusqlite(rusqlite::Error::QueryReturnedNoRows);
        assert_eq!(err.kind(), VtErrorKind::StorageUnavailable);
        assert_eq!(err.op(), Some("sqlite"));
    }

    #[test]
    fn test_checksum_mismatch_names_migration() {
        let err = checksum_mismatch("001_triple_store", "aa", "bb");
        assert_eq!(err.kind(), VtErrorKind::Migration);
        assert!(err.message().contains("001_triple_store"));
    }
}
