#![forbid(unsafe_code)]

//! The resolution context handed to every resolver plugin.

use hagalund_xml::XmlDocument;
use std::sync::Arc;

/// A URI reference together with everything needed to dereference it.
///
/// The context is built once per resolution call and never changes while
/// plugins look at it.  `uri` may be absent: some callers ask for "the
/// current input" without naming it, and plugins decide for themselves
/// whether that is resolvable.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    uri: Option<String>,
    base_uri: String,
    secure: bool,
    document: Option<Arc<XmlDocument>>,
}

impl ResolutionContext {
    /// Create a context for `uri` relative to `base_uri`.
    ///
    /// An empty `base_uri` means the reference has no base.
    pub fn new(uri: Option<&str>, base_uri: &str, secure: bool) -> Self {
        Self {
            uri: uri.map(str::to_owned),
            base_uri: base_uri.to_owned(),
            secure,
            document: None,
        }
    }

    /// Attach the document the reference was found in.
    ///
    /// Same-document resolvers (fragment, XPointer) select from it.
    pub fn with_document(mut self, document: Arc<XmlDocument>) -> Self {
        self.document = Some(document);
        self
    }

    /// The reference to resolve, if any.
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// The base URI, empty when there is none.
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Whether secure validation was requested.
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// The originating document, if one was attached.
    pub fn document(&self) -> Option<&Arc<XmlDocument>> {
        self.document.as_ref()
    }
}
