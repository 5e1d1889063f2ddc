//! Staleness detection: decide whether a destination must be rebuilt
//! without performing the merge.

use crate::config::MergeConfig;
use crate::directive::{self, ImportDirective};
use crate::error::MergeError;
use crate::hasher;
use crate::merge::MergeRequest;
use crate::metadata::ImportMetadata;
use crate::resolver;
use crate::stream;
use quick_xml::events::Event;
use std::fs;
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, warn};

/// Whether the destination is out of date relative to the source and its
/// imports.
///
/// Cheap checks run first; only when they all pass is the source scanned
/// for import directives, comparing fresh content hashes against the
/// sidecar store. The scan never descends into imported documents -
/// nested directives are not expanded by the merge either.
pub fn is_stale(request: &MergeRequest, config: &MergeConfig) -> Result<bool, MergeError> {
    if !request.destination().exists() {
        debug!("destination missing, rebuild required");
        return Ok(true);
    }
    if !request.metadata_path().exists() {
        debug!("metadata sidecar missing, rebuild required");
        return Ok(true);
    }
    if modified(request.source())? > modified(request.destination())? {
        debug!("source modified after destination, rebuild required");
        return Ok(true);
    }
    let Some(metadata) = ImportMetadata::load(request.metadata_path()) else {
        debug!("metadata store unusable, rebuild required");
        return Ok(true);
    };
    scan_imports(request, config, &metadata)
}

fn modified(path: &Path) -> Result<SystemTime, MergeError> {
    Ok(fs::metadata(path)?.modified()?)
}

/// Scan the source document for import directives and compare each resolved
/// target against the stored hashes, stopping at the first drift.
///
/// A directive whose target no longer exists is a configuration error and
/// aborts the whole operation rather than forcing a rebuild.
fn scan_imports(
    request: &MergeRequest,
    config: &MergeConfig,
    metadata: &ImportMetadata,
) -> Result<bool, MergeError> {
    let mut reader = stream::open_document(request.source())?;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(element) if directive::is_directive(&element) => {
                let directive = ImportDirective::parse(&element, reader.buffer_position() as u64)?;
                let target = request.base_dir().join(&directive.file);
                if !target.exists() {
                    return Err(MergeError::MissingImportTarget(target));
                }
                if target.is_file() {
                    if has_drifted(&target, metadata) {
                        return Ok(true);
                    }
                } else {
                    for file in
                        resolver::list_import_candidates(&target, directive.recursive, config)?
                    {
                        if has_drifted(&file, metadata) {
                            return Ok(true);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    Ok(false)
}

/// Whether a single import target differs from its stored hash. Unknown
/// paths and unreadable files count as drift.
fn has_drifted(path: &Path, metadata: &ImportMetadata) -> bool {
    let Some(stored) = metadata.hash_for(path) else {
        debug!("no stored hash for {}, rebuild required", path.display());
        return true;
    };
    match hasher::hash_file(path) {
        Ok(hash) => hash != stored,
        Err(e) => {
            warn!("hash verification failed for {}: {}", path.display(), e);
            true
        }
    }
}
