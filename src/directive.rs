//! Parsing of `import` directive elements.

use crate::error::MergeError;
use quick_xml::events::{BytesEnd, BytesStart};
use std::path::PathBuf;

/// Local name of the directive element.
pub const DIRECTIVE_ELEMENT: &[u8] = b"import";

const ATTR_FILE: &[u8] = b"file";
const ATTR_SKIP_ROOT: &[u8] = b"skipRoot";
const ATTR_RECURSIVE_IMPORT: &[u8] = b"recursiveImport";

/// A parsed `import` element.
///
/// `file` points at a single document or a directory, relative to the
/// request's base directory. `skip_root` drops the root element of every
/// imported document; `recursive` controls directory descent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDirective {
    pub file: PathBuf,
    pub skip_root: bool,
    pub recursive: bool,
}

/// Whether a start element is the directive element, in any namespace.
pub fn is_directive(element: &BytesStart) -> bool {
    element.name().local_name().as_ref() == DIRECTIVE_ELEMENT
}

/// Whether an end element closes a directive element.
pub fn is_directive_end(element: &BytesEnd) -> bool {
    element.name().local_name().as_ref() == DIRECTIVE_ELEMENT
}

impl ImportDirective {
    /// Parse directive attributes. `position` is the reader's byte offset,
    /// carried into the error when the required `file` attribute is absent.
    pub fn parse(element: &BytesStart, position: u64) -> Result<Self, MergeError> {
        let mut file = None;
        let mut skip_root = false;
        let mut recursive = true;

        for attribute in element.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::from)?;
            let value = attribute.unescape_value()?;
            match attribute.key.as_ref() {
                ATTR_FILE if !value.is_empty() => file = Some(PathBuf::from(value.into_owned())),
                ATTR_SKIP_ROOT => skip_root = parse_flag(&value),
                ATTR_RECURSIVE_IMPORT => recursive = parse_flag(&value),
                _ => {}
            }
        }

        let file = file.ok_or(MergeError::MalformedDirective {
            position,
            message: "attribute 'file' is missing or empty",
        })?;

        Ok(Self {
            file,
            skip_root,
            recursive,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}
