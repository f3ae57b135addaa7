#![forbid(unsafe_code)]

//! Built-in resolver backends.

pub mod anonymous;
pub mod fragment;
pub mod http;
pub mod local_fs;
pub mod xpointer;

pub use anonymous::AnonymousResolver;
pub use fragment::FragmentResolver;
pub use http::DirectHttpResolver;
pub use local_fs::LocalFilesystemResolver;
pub use xpointer::XPointerResolver;

use crate::context::ResolutionContext;
use hagalund_core::Error;
use hagalund_xml::{NodeSet, XmlDocument};
use tracing::debug;

/// Select the element carrying `id` from the context document.
///
/// In secure mode an ID that occurs on more than one element is refused,
/// otherwise a signature could be made to cover a different element than
/// the one the application later looks up.
pub(crate) fn select_by_id(
    document: &XmlDocument,
    id: &str,
    secure: bool,
    with_comments: bool,
) -> Result<NodeSet, Error> {
    let doc = document.parse_doc()?;
    if secure && document.count_id(&doc, id) > 1 {
        return Err(Error::DuplicateId(id.to_owned()));
    }
    let id_map = document.build_id_map(&doc);
    let node = hagalund_xml::xpath::resolve_id(&doc, &id_map, id)?;
    let set = if with_comments {
        NodeSet::tree_with_comments(node)
    } else {
        NodeSet::tree_without_comments(node)
    };
    debug!(id, nodes = set.len(), with_comments, "selected element by ID");
    Ok(set)
}

/// The document a same-document reference selects from.
pub(crate) fn context_document<'a>(
    ctx: &'a ResolutionContext,
    uri: &str,
) -> Result<&'a XmlDocument, Error> {
    ctx.document()
        .map(|doc| doc.as_ref())
        .ok_or_else(|| Error::MissingDocument(uri.to_owned()))
}

/// Source URI recorded for same-document content: the base URI with the
/// reference appended.
pub(crate) fn same_document_source(ctx: &ResolutionContext, uri: &str) -> String {
    format!("{}{uri}", ctx.base_uri())
}
