#![forbid(unsafe_code)]

//! Resolver for references that carry no URI.
//!
//! A `Reference` element may omit its `URI` attribute when the application
//! knows out of band what is signed.  This resolver hands back bytes the
//! caller supplied up front; it is not part of the defaults and is usually
//! passed as a per-call candidate.

use crate::content::ResolvedContent;
use crate::context::ResolutionContext;
use crate::plugin::{PluginKind, ResolverPlugin};
use crate::properties::PropertyBag;
use hagalund_core::Error;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AnonymousResolver {
    data: Arc<[u8]>,
    properties: PropertyBag,
}

impl AnonymousResolver {
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            data: data.into(),
            properties: PropertyBag::new(),
        }
    }

    /// Read the content from a file now, so that later resolution does not
    /// touch the filesystem.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        Ok(Self::from_bytes(std::fs::read(path)?))
    }
}

impl ResolverPlugin for AnonymousResolver {
    fn name(&self) -> &str {
        "AnonymousResolver"
    }

    fn kind(&self) -> PluginKind {
        PluginKind::Anonymous
    }

    fn can_resolve(&self, ctx: &ResolutionContext) -> bool {
        ctx.uri().is_none()
    }

    fn resolve(&self, _ctx: &ResolutionContext) -> Result<ResolvedContent, Error> {
        Ok(ResolvedContent::octets(self.data.to_vec()))
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
