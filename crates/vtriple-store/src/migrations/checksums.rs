//! SHA256 checksums of migration SQL, recorded in `schema_version` so an
//! edited migration is caught on the next open.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA256 of `content`
pub fn compute_checksum(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
