//! Content hashing for change detection using BLAKE3.

use crate::error::MergeError;
use std::fs::File;
use std::io;
use std::path::Path;

/// Compute the content hash of a file as a lowercase hex string.
///
/// Deterministic and dependent only on the file's bytes. This is a
/// change-detection cache key, not a security boundary.
pub fn hash_file(path: &Path) -> Result<String, MergeError> {
    let mut file = File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hasher.finalize().to_hex().to_string())
}

/// Hash a byte slice. For callers that already hold the content.
pub fn hash_bytes(content: &[u8]) -> String {
    blake3::hash(content).to_hex().to_string()
}
