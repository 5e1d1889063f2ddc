//! Directory resolution for directory-style imports.

use crate::config::MergeConfig;
use crate::error::MergeError;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// List the files a directory import expands to, in lexicographic order.
///
/// Hidden entries are skipped, as are files missing the document suffix or
/// carrying the reserved prefix. With `recursive` the walk descends into
/// every non-hidden subdirectory, otherwise only the top level is listed.
/// The sort makes directory imports reproducible regardless of the
/// filesystem's own listing order.
pub fn list_import_candidates(
    directory: &Path,
    recursive: bool,
    config: &MergeConfig,
) -> Result<Vec<PathBuf>, MergeError> {
    let max_depth = if recursive { usize::MAX } else { 1 };

    let walker = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));

    let mut candidates = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            MergeError::Io(io::Error::new(
                io::ErrorKind::Other,
                format!("failed to walk {}: {}", directory.display(), e),
            ))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !name.ends_with(&config.document_suffix) || name.starts_with(&config.reserved_prefix) {
            continue;
        }
        candidates.push(entry.into_path());
    }

    candidates.sort();
    Ok(candidates)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
