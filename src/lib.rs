//! xmlfuse: incremental XML include merge engine.
//!
//! Flattens a root XML document by expanding its `import` directives into
//! the referenced files or directories, and skips the merge entirely when
//! a content-hash cache shows nothing relevant changed on disk. Output is
//! crash-safe: the destination and its hash sidecar are committed or
//! discarded as a pair.

pub mod cli;
pub mod config;
pub mod directive;
pub mod error;
pub mod hasher;
pub mod logging;
pub mod merge;
pub mod metadata;
pub mod resolver;
pub mod staleness;
pub mod stream;

pub use config::MergeConfig;
pub use error::MergeError;
pub use merge::{MergeOutcome, MergeRequest, Merger};

/// Merge `source` into `destination` with default configuration, resolving
/// imports against the source's containing directory. No-op when the
/// destination is already up to date.
pub fn process(
    source: impl Into<std::path::PathBuf>,
    destination: impl Into<std::path::PathBuf>,
) -> Result<MergeOutcome, MergeError> {
    Merger::new(MergeRequest::new(source, destination)).process()
}
