#![forbid(unsafe_code)]

//! Parsing of the same-document reference forms used by XML-DSig.
//!
//! Only the patterns a signature reference may carry are recognised:
//! - the empty reference `""` (whole document)
//! - bare-name fragments `#id-value`
//! - `#xpointer(/)` and `#xpointer(id('id-value'))`

use hagalund_core::Error;
use std::collections::HashMap;

/// Prefix shared by every XPointer reference.
pub const XPOINTER_PREFIX: &str = "#xpointer(";

/// Parse a bare-name same-document reference (e.g., `#foo` → `foo`).
///
/// XPointer references are not bare names and yield `None`.
pub fn parse_same_document_ref(uri: &str) -> Option<&str> {
    if uri.starts_with(XPOINTER_PREFIX) {
        return None;
    }
    uri.strip_prefix('#')
}

/// Check for the `#xpointer(/)` whole-document reference.
pub fn is_xpointer_root(uri: &str) -> bool {
    uri == "#xpointer(/)"
}

/// Parse an `#xpointer(id('...'))` reference and return the ID value.
///
/// Both quote styles are accepted; the quotes must match and the ID must
/// be non-empty.
pub fn parse_xpointer_id(uri: &str) -> Option<&str> {
    let inner = uri.strip_prefix("#xpointer(id(")?.strip_suffix("))")?;
    let quote = inner.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let id = inner.strip_prefix(quote)?.strip_suffix(quote)?;
    if id.is_empty() || id.contains(quote) {
        return None;
    }
    Some(id)
}

/// Resolve an ID value in a parsed document using a pre-built ID map.
pub fn resolve_id<'a>(
    doc: &'a roxmltree::Document<'a>,
    id_map: &HashMap<String, roxmltree::NodeId>,
    id: &str,
) -> Result<roxmltree::Node<'a, 'a>, Error> {
    id_map
        .get(id)
        .and_then(|nid| doc.get_node(*nid))
        .ok_or_else(|| Error::IdNotFound(id.to_owned()))
}
