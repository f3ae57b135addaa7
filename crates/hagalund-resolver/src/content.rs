#![forbid(unsafe_code)]

//! Resolved content returned to the caller.

use hagalund_core::Error;
use hagalund_xml::NodeSet;

/// MIME type reported for same-document selections.
pub const MIME_XML: &str = "text/xml";

/// The data a resolver produced.
#[derive(Debug, Clone)]
pub enum ContentData {
    /// Raw octets (files, HTTP bodies, anonymous input).
    Octets(Vec<u8>),
    /// An XML document and the nodes selected from it.
    Xml {
        xml_text: String,
        node_set: Option<NodeSet>,
    },
}

/// Resolved payload plus provenance.  Owned by the caller once returned.
#[derive(Debug, Clone)]
pub struct ResolvedContent {
    data: ContentData,
    source_uri: Option<String>,
    mime_type: Option<String>,
}

impl ResolvedContent {
    /// Wrap raw octets.
    pub fn octets(bytes: Vec<u8>) -> Self {
        Self {
            data: ContentData::Octets(bytes),
            source_uri: None,
            mime_type: None,
        }
    }

    /// Wrap an XML document with an optional node selection.
    pub fn xml(xml_text: String, node_set: Option<NodeSet>) -> Self {
        Self {
            data: ContentData::Xml { xml_text, node_set },
            source_uri: None,
            mime_type: Some(MIME_XML.to_owned()),
        }
    }

    /// Record where the content came from.
    pub fn with_source_uri(mut self, uri: impl Into<String>) -> Self {
        self.source_uri = Some(uri.into());
        self
    }

    /// Record the MIME type of the content.
    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    pub fn data(&self) -> &ContentData {
        &self.data
    }

    pub fn source_uri(&self) -> Option<&str> {
        self.source_uri.as_deref()
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Whether the content is a raw octet stream.
    pub fn is_octets(&self) -> bool {
        matches!(self.data, ContentData::Octets(_))
    }

    /// Whether the content is a node selection from an XML document.
    pub fn is_node_set(&self) -> bool {
        matches!(
            self.data,
            ContentData::Xml {
                node_set: Some(_),
                ..
            }
        )
    }

    /// Whether comment nodes were left out of the selection.
    pub fn excludes_comments(&self) -> bool {
        match &self.data {
            ContentData::Xml {
                node_set: Some(ns), ..
            } => !ns.includes_comments(),
            _ => false,
        }
    }

    /// Raw bytes of the content.
    ///
    /// For a subtree selection this is the source text of the selected
    /// element, for a whole-document selection the document text.  No
    /// canonicalization is applied, so comments stay in the bytes even
    /// when [`ResolvedContent::excludes_comments`] is set; that flag tells
    /// the canonicalizer what to drop.
    ///
    /// A selection span that does not fall on the text is an error rather
    /// than a fallback to the whole document.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        match &self.data {
            ContentData::Octets(bytes) => Ok(bytes.clone()),
            ContentData::Xml { xml_text, node_set } => {
                match node_set.as_ref().and_then(NodeSet::span) {
                    Some(span) => xml_text
                        .get(span.clone())
                        .map(|text| text.as_bytes().to_vec())
                        .ok_or_else(|| {
                            Error::XmlStructure(format!(
                                "selection {}..{} is outside the document text",
                                span.start, span.end
                            ))
                        }),
                    None => Ok(xml_text.as_bytes().to_vec()),
                }
            }
        }
    }
}
