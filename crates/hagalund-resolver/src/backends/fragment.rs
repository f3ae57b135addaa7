#![forbid(unsafe_code)]

//! Same-document bare-name resolver.
//!
//! Handles:
//! - Empty URI (`""`): the entire document minus comments
//! - Bare-name references (`#id`): the element subtree minus comments

use crate::content::ResolvedContent;
use crate::context::ResolutionContext;
use crate::plugin::{PluginKind, ResolverPlugin};
use crate::properties::PropertyBag;
use hagalund_core::Error;
use hagalund_xml::{xpath, NodeSet};

/// Resolves `""` and `#id` against the document attached to the context.
#[derive(Debug, Clone, Default)]
pub struct FragmentResolver {
    properties: PropertyBag,
}

impl FragmentResolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResolverPlugin for FragmentResolver {
    fn name(&self) -> &str {
        "FragmentResolver"
    }

    fn kind(&self) -> PluginKind {
        PluginKind::Fragment
    }

    fn can_resolve(&self, ctx: &ResolutionContext) -> bool {
        match ctx.uri() {
            Some(uri) => uri.is_empty() || xpath::parse_same_document_ref(uri).is_some(),
            None => false,
        }
    }

    fn resolve(&self, ctx: &ResolutionContext) -> Result<ResolvedContent, Error> {
        let uri = ctx
            .uri()
            .ok_or_else(|| Error::InvalidUri("fragment resolver needs a URI".into()))?;
        let document = super::context_document(ctx, uri)?;

        let node_set = if uri.is_empty() {
            let doc = document.parse_doc()?;
            NodeSet::all_without_comments(&doc)
        } else {
            let id = xpath::parse_same_document_ref(uri)
                .ok_or_else(|| Error::InvalidUri(format!("not a bare-name reference: {uri}")))?;
            super::select_by_id(document, id, ctx.is_secure(), false)?
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
