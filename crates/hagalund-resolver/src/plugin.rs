#![forbid(unsafe_code)]

//! The capability contract every resolver backend implements.

use crate::content::ResolvedContent;
use crate::context::ResolutionContext;
use crate::properties::PropertyBag;
use hagalund_core::Error;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a resolver plugin, as stored in the registry and
/// passed in per-call candidate lists.
pub type PluginHandle = Arc<dyn ResolverPlugin>;

/// The class of resource a resolver reaches.
///
/// The secure-mode gate decides on this tag alone, so a third-party
/// backend that reads files or talks to the network should report
/// [`PluginKind::LocalFilesystem`] or [`PluginKind::DirectHttp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginKind {
    /// Same-document bare-name references (`""`, `#id`).
    Fragment,
    /// Same-document XPointer references.
    XPointer,
    /// Files on the local filesystem.
    LocalFilesystem,
    /// Resources fetched directly over HTTP(S).
    DirectHttp,
    /// Caller-supplied input for references without a URI.
    Anonymous,
    /// Anything else.
    Custom,
}

impl PluginKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluginKind::Fragment => "fragment",
            PluginKind::XPointer => "xpointer",
            PluginKind::LocalFilesystem => "local-filesystem",
            PluginKind::DirectHttp => "direct-http",
            PluginKind::Anonymous => "anonymous",
            PluginKind::Custom => "custom",
        }
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A backend able to turn one class of URI reference into content.
///
/// Plugins are shared between threads through [`PluginHandle`].  A plugin
/// that keeps per-call state (its property bag included) reports
/// `is_thread_safe() == false`; the engine then works on a
/// [`fresh_instance`](ResolverPlugin::fresh_instance) for every call
/// instead of the registered one.
pub trait ResolverPlugin: Send + Sync {
    /// Human-readable name for diagnostics.
    fn name(&self) -> &str;

    /// The resource class this plugin reaches.
    fn kind(&self) -> PluginKind;

    /// Whether this plugin claims the reference in `ctx`.
    fn can_resolve(&self, ctx: &ResolutionContext) -> bool;

    /// Dereference the reference in `ctx`.
    fn resolve(&self, ctx: &ResolutionContext) -> Result<ResolvedContent, Error>;

    /// Whether one instance may serve concurrent calls.
    fn is_thread_safe(&self) -> bool {
        false
    }

    /// Create an independent instance of the same plugin.
    fn fresh_instance(&self) -> Result<Box<dyn ResolverPlugin>, Error>;

    fn properties(&self) -> &PropertyBag;

    fn properties_mut(&mut self) -> &mut PropertyBag;

    /// Property keys this plugin gives meaning to.
    fn supported_properties(&self) -> &[&'static str] {
        &[]
    }

    fn set_property(&mut self, key: &str, value: &str) {
        self.properties_mut().set(key, value);
    }

    fn get_property(&self, key: &str) -> Option<String> {
        self.properties().get(key).map(str::to_owned)
    }

    fn add_properties(&mut self, props: &HashMap<String, String>) {
        self.properties_mut().extend(props);
    }

    fn property_keys(&self) -> Vec<String> {
        self.supported_properties()
            .iter()
            .map(|key| (*key).to_owned())
            .collect()
    }

    /// Whether setting `key` would have any effect on this plugin.
    fn understands(&self, key: &str) -> bool {
        self.supported_properties().iter().any(|k| *k == key)
    }
}
