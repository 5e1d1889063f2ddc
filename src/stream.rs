//! Shared helpers over the `quick_xml` event stream.

use crate::error::MergeError;
use quick_xml::events::{BytesStart, BytesText};
use quick_xml::Reader;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A streaming reader over an XML document on disk.
pub type DocumentReader = Reader<BufReader<File>>;

/// Open a streaming reader over a document.
///
/// Self-closing elements are expanded into start/end pairs so the rest of
/// the engine sees one uniform event shape.
pub fn open_document(path: &Path) -> Result<DocumentReader, MergeError> {
    let file = File::open(path)?;
    let mut reader = Reader::from_reader(BufReader::new(file));
    reader.config_mut().expand_empty_elements = true;
    Ok(reader)
}

/// Whether a text event carries only whitespace.
pub fn is_blank(text: &BytesText) -> bool {
    let bytes: &[u8] = text.as_ref();
    bytes.iter().all(|b| b.is_ascii_whitespace())
}

/// Re-create a start element without its namespace declarations.
///
/// An imported root element nests inside a foreign document and must not
/// repeat `xmlns` bindings there; every other attribute is preserved as
/// written.
pub fn strip_namespace_decls(element: &BytesStart) -> Result<BytesStart<'static>, MergeError> {
    let mut stripped = element.clone().into_owned();
    stripped.clear_attributes();
    for attribute in element.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let key = attribute.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            continue;
        }
        stripped.push_attribute((attribute.key.as_ref(), attribute.value.as_ref()));
    }
    Ok(stripped)
}
