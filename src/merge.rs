//! Merge engine: streams the source document into the destination,
//! expanding `import` directives into the referenced content.
//!
//! Expansion is single-level: directives found inside an imported document
//! are copied through verbatim, never expanded in turn.

use crate::config::MergeConfig;
use crate::directive::{self, ImportDirective};
use crate::error::MergeError;
use crate::hasher;
use crate::metadata::ImportMetadata;
use crate::resolver;
use crate::staleness;
use crate::stream;
use quick_xml::events::{BytesText, Event};
use quick_xml::Writer;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Comment inserted at the top of every generated document.
const GENERATED_NOTICE: &str = " This file is machine-generated. Do not edit. ";

/// One merge invocation: where to read, where to write, and where import
/// paths resolve from.
#[derive(Debug, Clone)]
pub struct MergeRequest {
    source: PathBuf,
    destination: PathBuf,
    base_dir: PathBuf,
    metadata_path: PathBuf,
}

impl MergeRequest {
    /// New request with the base directory defaulting to the source's
    /// containing directory.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        let source = source.into();
        let base_dir = source.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::with_base_dir(source, destination, base_dir)
    }

    /// New request with an explicit base directory for import resolution.
    pub fn with_base_dir(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        base_dir: impl Into<PathBuf>,
    ) -> Self {
        let destination = destination.into();
        let metadata_path = metadata_path_for(&destination);
        Self {
            source: source.into(),
            destination,
            base_dir: base_dir.into(),
            metadata_path,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Sidecar the destination's import hashes live in.
    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }
}

/// Sidecar path: the destination path with `.hashes` appended.
fn metadata_path_for(destination: &Path) -> PathBuf {
    let mut path = destination.as_os_str().to_os_string();
    path.push(".hashes");
    PathBuf::from(path)
}

/// Result of a `process` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Destination already reflected the source and its imports.
    UpToDate,
    /// Destination was regenerated from this many inlined documents.
    Merged { imported_files: usize },
}

/// The merge engine. Owns a request and the engine configuration.
pub struct Merger {
    request: MergeRequest,
    config: MergeConfig,
}

impl Merger {
    pub fn new(request: MergeRequest) -> Self {
        Self::with_config(request, MergeConfig::default())
    }

    pub fn with_config(request: MergeRequest, config: MergeConfig) -> Self {
        Self { request, config }
    }

    pub fn request(&self) -> &MergeRequest {
        &self.request
    }

    /// Regenerate the destination if it is stale, otherwise do nothing.
    ///
    /// Any failure past the source-existence check removes the destination
    /// and its sidecar as a pair, so a broken run never leaves a
    /// half-written or inconsistent output on disk.
    pub fn process(&self) -> Result<MergeOutcome, MergeError> {
        debug!(
            "processing {} into {}",
            self.request.source.display(),
            self.request.destination.display()
        );

        if !self.request.source.exists() {
            return Err(MergeError::MissingSource(self.request.source.clone()));
        }

        let guard = OutputPair::new(&self.request);

        if !staleness::is_stale(&self.request, &self.config)? {
            debug!("destination up to date");
            guard.commit();
            return Ok(MergeOutcome::UpToDate);
        }

        info!("changes detected, merging {}", self.request.source.display());
        let outcome = self.merge_into_destination()?;
        guard.commit();
        Ok(outcome)
    }

    /// Regenerate the destination unconditionally, skipping the staleness
    /// check.
    pub fn rebuild(&self) -> Result<MergeOutcome, MergeError> {
        if !self.request.source.exists() {
            return Err(MergeError::MissingSource(self.request.source.clone()));
        }
        let guard = OutputPair::new(&self.request);
        let outcome = self.merge_into_destination()?;
        guard.commit();
        Ok(outcome)
    }

    /// Single pass over the source stream; writes the destination, then the
    /// refreshed sidecar.
    fn merge_into_destination(&self) -> Result<MergeOutcome, MergeError> {
        let mut reader = stream::open_document(&self.request.source)?;
        let file = File::create(&self.request.destination)?;
        let mut writer = Writer::new(BufWriter::new(file));
        let mut metadata = ImportMetadata::new();
        let mut notice_written = false;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_event_into(&mut buf)? {
                Event::Eof => break,
                Event::Comment(_) => {}
                Event::Text(text) if stream::is_blank(&text) => {}
                Event::Decl(decl) => {
                    writer.write_event(Event::Decl(decl))?;
                    write_notice(&mut writer)?;
                    notice_written = true;
                }
                Event::Start(element) if directive::is_directive(&element) => {
                    if !notice_written {
                        write_notice(&mut writer)?;
                        notice_written = true;
                    }
                    let directive =
                        ImportDirective::parse(&element, reader.buffer_position() as u64)?;
                    self.expand_import(&directive, &mut writer, &mut metadata)?;
                }
                Event::End(element) if directive::is_directive_end(&element) => {}
                event => {
                    if !notice_written {
                        write_notice(&mut writer)?;
                        notice_written = true;
                    }
                    writer.write_event(event)?;
                }
            }
        }

        writer.into_inner().flush()?;
        metadata.save(&self.request.metadata_path)?;

        Ok(MergeOutcome::Merged {
            imported_files: metadata.len(),
        })
    }

    /// Expand one directive: a single file, or every candidate under a
    /// directory target.
    fn expand_import<W: Write>(
        &self,
        directive: &ImportDirective,
        writer: &mut Writer<W>,
        metadata: &mut ImportMetadata,
    ) -> Result<(), MergeError> {
        let target = self.request.base_dir.join(&directive.file);
        if !target.exists() {
            return Err(MergeError::MissingImportTarget(target));
        }

        if target.is_file() {
            self.import_file(&target, directive.skip_root, writer, metadata)
        } else {
            debug!("expanding directory import {}", target.display());
            for file in
                resolver::list_import_candidates(&target, directive.recursive, &self.config)?
            {
                self.import_file(&file, directive.skip_root, writer, metadata)?;
            }
            Ok(())
        }
    }

    /// Inline one document into the destination stream.
    ///
    /// The document's own prolog, comments and blank text are dropped. The
    /// root element is tracked by depth so `skip_root` removes exactly the
    /// outermost start/end pair; otherwise the root is re-emitted without
    /// namespace declarations. Nested `import` elements pass through
    /// verbatim.
    fn import_file<W: Write>(
        &self,
        path: &Path,
        skip_root: bool,
        writer: &mut Writer<W>,
        metadata: &mut ImportMetadata,
    ) -> Result<(), MergeError> {
        debug!("appending {}", path.display());
        metadata.record(path, hasher::hash_file(path)?);

        let mut reader = stream::open_document(path)?;
        let mut depth = 0usize;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_event_into(&mut buf)? {
                Event::Eof => break,
                Event::Decl(_) | Event::DocType(_) => {}
                Event::Comment(_) => {}
                Event::Text(text) if stream::is_blank(&text) => {}
                Event::Start(element) => {
                    let is_root = depth == 0;
                    depth += 1;
                    if is_root {
                        if !skip_root {
                            writer
                                .write_event(Event::Start(stream::strip_namespace_decls(&element)?))?;
                        }
                    } else {
                        writer.write_event(Event::Start(element))?;
                    }
                }
                Event::End(element) => {
                    let closes_root = depth == 1;
                    depth = depth.saturating_sub(1);
                    if !(closes_root && skip_root) {
                        writer.write_event(Event::End(element))?;
                    }
                }
                event => writer.write_event(event)?,
            }
        }

        Ok(())
    }
}

fn write_notice<W: Write>(writer: &mut Writer<W>) -> Result<(), MergeError> {
    writer
        .write_event(Event::Comment(BytesText::from_escaped(GENERATED_NOTICE)))
        .map_err(MergeError::from)
}

/// Owns the destination/sidecar pair for the duration of one operation.
///
/// Dropping the guard without committing removes both files, keeping the
/// pair coupled on every exit path, panics included.
struct OutputPair<'a> {
    destination: &'a Path,
    metadata_path: &'a Path,
    committed: bool,
}

impl<'a> OutputPair<'a> {
    fn new(request: &'a MergeRequest) -> Self {
        Self {
            destination: &request.destination,
            metadata_path: &request.metadata_path,
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for OutputPair<'_> {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(self.destination);
            let _ = fs::remove_file(self.metadata_path);
        }
    }
}
