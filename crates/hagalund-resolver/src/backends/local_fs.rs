#![forbid(unsafe_code)]

//! Local filesystem resolver for `file:` references.

use crate::content::ResolvedContent;
use crate::context::ResolutionContext;
use crate::plugin::{PluginKind, ResolverPlugin};
use crate::properties::PropertyBag;
use crate::uri;
use hagalund_core::Error;
use tracing::debug;

/// Reads the file a reference resolves to.
///
/// Claims any reference that is not same-document, not `http:`, and whose
/// resolution against the base URI has the `file` scheme.
#[derive(Debug, Clone, Default)]
pub struct LocalFilesystemResolver {
    properties: PropertyBag,
}

impl LocalFilesystemResolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResolverPlugin for LocalFilesystemResolver {
    fn name(&self) -> &str {
        "LocalFilesystemResolver"
    }

    fn kind(&self) -> PluginKind {
        PluginKind::LocalFilesystem
    }

    fn can_resolve(&self, ctx: &ResolutionContext) -> bool {
        let Some(reference) = ctx.uri() else {
            return false;
        };
        if uri::is_same_document(reference) || reference.starts_with("http:") {
            return false;
        }
        uri::resolved_scheme(ctx.base_uri(), reference).as_deref() == Some("file")
    }

    fn resolve(&self, ctx: &ResolutionContext) -> Result<ResolvedContent, Error> {
        let reference = ctx
            .uri()
            .ok_or_else(|| Error::InvalidUri("filesystem resolver needs a URI".into()))?;
        let url = uri::without_fragment(uri::join(ctx.base_uri(), reference)?);
        let path = url
            .to_file_path()
            .map_err(|()| Error::InvalidUri(format!("not a local file: {url}")))?;
        debug!(path = %path.display(), "reading referenced file");
        let data = std::fs::read(&path)?;
        Ok(ResolvedContent::octets(data).with_source_uri(url.as_str()))
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
