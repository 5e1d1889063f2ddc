//! Sidecar store mapping imported file paths to content hashes.
//!
//! The store lives next to the destination as plain text: a comment header
//! followed by one `path=hash` line per imported file. It is only a
//! change-detection cache; a missing or unreadable store forces a rebuild
//! rather than failing the operation.

use crate::error::MergeError;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

const HEADER: &str = "# Import hashes for the merged document. Machine-generated - do not edit.";

/// Mapping from resolved import path to last-seen content hash.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportMetadata {
    entries: BTreeMap<String, String>,
}

impl ImportMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the hash of a file that contributed to the destination.
    pub fn record(&mut self, path: &Path, hash: String) {
        self.entries.insert(path.to_string_lossy().into_owned(), hash);
    }

    /// Stored hash for a path, if any.
    pub fn hash_for(&self, path: &Path) -> Option<&str> {
        self.entries
            .get(path.to_string_lossy().as_ref())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load the store from disk.
    ///
    /// Any failure - missing file, unreadable contents, malformed line -
    /// yields `None`: the cache is unusable and the caller must rebuild.
    pub fn load(path: &Path) -> Option<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!("metadata store unreadable at {}: {}", path.display(), e);
                return None;
            }
        };

        let mut entries = BTreeMap::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            // Hashes never contain '=', so the last one separates key from value.
            let Some((file_path, hash)) = line.rsplit_once('=') else {
                debug!("malformed metadata line, discarding store: {:?}", line);
                return None;
            };
            entries.insert(file_path.to_string(), hash.to_string());
        }

        Some(Self { entries })
    }

    /// Persist the store. Failures are fatal to the surrounding merge.
    pub fn save(&self, path: &Path) -> Result<(), MergeError> {
        let mut file = fs::File::create(path)?;
        writeln!(file, "{}", HEADER)?;
        for (file_path, hash) in &self.entries {
            writeln!(file, "{}={}", file_path, hash)?;
        }
        Ok(())
    }
}
