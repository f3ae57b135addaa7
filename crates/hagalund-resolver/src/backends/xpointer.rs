#![forbid(unsafe_code)]

//! XPointer subset resolver: `#xpointer(/)` and `#xpointer(id('...'))`.
//!
//! Unlike bare-name references, XPointer selections keep comment nodes.

use crate::content::ResolvedContent;
use crate::context::ResolutionContext;
use crate::plugin::{PluginKind, ResolverPlugin};
use crate::properties::PropertyBag;
use hagalund_core::Error;
use hagalund_xml::{xpath, NodeSet};

#[derive(Debug, Clone, Default)]
pub struct XPointerResolver {
    properties: PropertyBag,
}

impl XPointerResolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResolverPlugin for XPointerResolver {
    fn name(&self) -> &str {
        "XPointerResolver"
    }

    fn kind(&self) -> PluginKind {
        PluginKind::XPointer
    }

    fn can_resolve(&self, ctx: &ResolutionContext) -> bool {
        ctx.uri().is_some_and(|uri| {
            xpath::is_xpointer_root(uri) || xpath::parse_xpointer_id(uri).is_some()
        })
    }

    fn resolve(&self, ctx: &ResolutionContext) -> Result<ResolvedContent, Error> {
        let uri = ctx
            .uri()
            .ok_or_else(|| Error::InvalidUri("XPointer resolver needs a URI".into()))?;
        let document = super::context_document(ctx, uri)?;

        let node_set = if xpath::is_xpointer_root(uri) {
            let doc = document.parse_doc()?;
            NodeSet::all(&doc)
        } else {
            let id = xpath::parse_xpointer_id(uri)
                .ok_or_else(|| Error::InvalidUri(format!("unsupported XPointer: {uri}")))?;
            super::select_by_id(document, id, ctx.is_secure(), true)?
        };

        Ok(
            ResolvedContent::xml(document.text().to_owned(), Some(node_set))
                .with_source_uri(super::same_document_source(ctx, uri)),
        )
    }

    fn is_thread_safe(&self) -> bool {
        true
    }

    fn fresh_instance(&self) -> Result<Box<dyn ResolverPlugin>, Error> {
        Ok(Box::new(self.clone()))
    }

    fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hagalund_xml::XmlDocument;
    use std::sync::Arc;

    const DOC: &str = "<root><!-- top --><a Id=\"x\"><!-- in --><b/></a><c Id=\"d\">first</c><c Id=\"d\">second</c></root>";

    fn ctx(uri: &str, secure: bool) -> ResolutionContext {
        let doc = XmlDocument::parse(DOC.to_owned()).unwrap();
        ResolutionContext::new(Some(uri), "", secure).with_document(Arc::new(doc))
    }

    #[test]
    fn test_can_resolve() {
        let r = XPointerResolver::new();
        assert!(r.can_resolve(&ctx("#xpointer(/)", false)));
        assert!(r.can_resolve(&ctx("#xpointer(id('x'))", false)));
        assert!(r.can_resolve(&ctx("#xpointer(id(\"x\"))", false)));
        assert!(!r.can_resolve(&ctx("#xpointer(//a)", false)));
        assert!(!r.can_resolve(&ctx("#x", false)));
        assert!(!r.can_resolve(&ResolutionContext::new(None, "", false)));
    }

    #[test]
    fn test_root_keeps_comments() {
        let content = XPointerResolver::new()
            .resolve(&ctx("#xpointer(/)", false))
            .unwrap();
        assert!(content.is_node_set());
        assert!(!content.excludes_comments());
        assert_eq!(content.to_bytes().unwrap(), DOC.as_bytes());
    }

    #[test]
    fn test_id_subtree_keeps_comments() {
        let content = XPointerResolver::new()
            .resolve(&ctx("#xpointer(id('x'))", false))
            .unwrap();
        assert!(!content.excludes_comments());
        assert_eq!(content.to_bytes().unwrap(), b"<a Id=\"x\"><!-- in --><b/></a>");
        assert_eq!(content.source_uri(), Some("#xpointer(id('x'))"));
    }

    #[test]
    fn test_duplicate_id_in_secure_mode() {
        let r = XPointerResolver::new();
        let content = r.resolve(&ctx("#xpointer(id('d'))", false)).unwrap();
        assert_eq!(content.to_bytes().unwrap(), b"<c Id=\"d\">first</c>");
        assert!(matches!(
            r.resolve(&ctx("#xpointer(id('d'))", true)),
            Err(Error::DuplicateId(_))
        ));
    }
}
