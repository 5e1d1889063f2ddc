//! Error types for the merge engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while checking staleness or performing a merge.
///
/// Metadata sidecar *load* failures are deliberately absent: an unusable
/// cache degrades to a rebuild instead of failing the operation.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("source document not found: {0}")]
    MissingSource(PathBuf),

    #[error("malformed import directive near byte {position}: {message}")]
    MalformedDirective { position: u64, message: &'static str },

    #[error("missing import target: {0}")]
    MissingImportTarget(PathBuf),

    #[error("document syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
