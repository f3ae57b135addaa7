#![forbid(unsafe_code)]

//! Ordered registry of resolver plugins.
//!
//! Registration order is priority order: the engine tries plugins front to
//! back and the first one that claims a reference wins.  The registry is
//! append-only; there is no way to remove a plugin once registered.

use crate::backends::{
    DirectHttpResolver, FragmentResolver, LocalFilesystemResolver, XPointerResolver,
};
use crate::plugin::{PluginHandle, ResolverPlugin};
use hagalund_core::Error;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::{debug, warn};

/// Constructor used by [`Registry::register_by_name`].
pub type ResolverFactory =
    Arc<dyn Fn() -> Result<Box<dyn ResolverPlugin>, Error> + Send + Sync>;

/// A registered plugin and whether it may be shared between calls.
#[derive(Clone)]
pub struct PluginRegistration {
    plugin: PluginHandle,
    thread_safe: bool,
}

impl PluginRegistration {
    fn new(plugin: PluginHandle) -> Self {
        let thread_safe = plugin.is_thread_safe();
        Self {
            plugin,
            thread_safe,
        }
    }

    pub fn plugin(&self) -> &PluginHandle {
        &self.plugin
    }

    pub fn is_thread_safe(&self) -> bool {
        self.thread_safe
    }
}

/// The set of globally known resolver plugins.
pub struct Registry {
    plugins: Mutex<Vec<PluginRegistration>>,
    factories: Mutex<HashMap<String, ResolverFactory>>,
}

impl Registry {
    /// Create an empty registry.  The built-in backends are known by name
    /// (`fragment`, `local-filesystem`, `xpointer`, `direct-http`) but none
    /// is registered.
    pub fn new() -> Self {
        let registry = Self {
            plugins: Mutex::new(Vec::new()),
            factories: Mutex::new(HashMap::new()),
        };
        registry.register_factory("fragment", || Ok(Box::new(FragmentResolver::new())));
        registry.register_factory("local-filesystem", || {
            Ok(Box::new(LocalFilesystemResolver::new()))
        });
        registry.register_factory("xpointer", || Ok(Box::new(XPointerResolver::new())));
        registry.register_factory("direct-http", || Ok(Box::new(DirectHttpResolver::new())));
        registry
    }

    /// Create a registry holding the default resolvers.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register_defaults();
        registry
    }

    /// Process-wide registry holding the default resolvers, created on
    /// first use.
    pub fn default_instance() -> &'static Registry {
        static DEFAULT: OnceLock<Registry> = OnceLock::new();
        DEFAULT.get_or_init(Registry::with_defaults)
    }

    /// Register a plugin at the end (or, with `at_front`, the start) of the
    /// priority order.  The same plugin may be registered more than once.
    pub fn register(&self, plugin: PluginHandle, at_front: bool) {
        debug!(
            resolver = plugin.name(),
            kind = %plugin.kind(),
            at_front,
            "registering resolver"
        );
        let registration = PluginRegistration::new(plugin);
        let mut plugins = self.lock_plugins();
        if at_front {
            plugins.insert(0, registration);
        } else {
            plugins.push(registration);
        }
    }

    /// Make a named constructor available to [`Registry::register_by_name`].
    /// A factory registered under an existing name replaces it.
    pub fn register_factory<F>(&self, type_name: &str, factory: F)
    where
        F: Fn() -> Result<Box<dyn ResolverPlugin>, Error> + Send + Sync + 'static,
    {
        self.factories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(type_name.to_owned(), Arc::new(factory));
    }

    /// Instantiate the plugin registered under `type_name` and register it.
    ///
    /// Best effort: an unknown name or a failing constructor is logged as a
    /// warning and the registration is skipped.
    pub fn register_by_name(&self, type_name: &str, at_front: bool) {
        match self.instantiate(type_name) {
            Ok(plugin) => self.register(Arc::from(plugin), at_front),
            Err(e) => warn!(type_name, error = %e, "skipping resolver registration"),
        }
    }

    /// Register each named plugin at the end, in order.  Failures are
    /// skipped as in [`Registry::register_by_name`].
    pub fn register_all_by_name<I, S>(&self, type_names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in type_names {
            self.register_by_name(name.as_ref(), false);
        }
    }

    /// Register the default resolvers: fragment, local filesystem, XPointer
    /// and direct HTTP, in that order.
    pub fn register_defaults(&self) {
        self.register(Arc::new(FragmentResolver::new()), false);
        self.register(Arc::new(LocalFilesystemResolver::new()), false);
        self.register(Arc::new(XPointerResolver::new()), false);
        self.register(Arc::new(DirectHttpResolver::new()), false);
    }

    /// Point-in-time copy of the registrations in priority order.
    ///
    /// The lock is released before this returns, so plugins may be invoked
    /// on the snapshot without blocking registration.
    pub fn snapshot(&self) -> Vec<PluginRegistration> {
        self.lock_plugins().clone()
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.lock_plugins().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_plugins().is_empty()
    }

    fn instantiate(&self, type_name: &str) -> Result<Box<dyn ResolverPlugin>, Error> {
        let factory = self
            .factories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_name)
            .cloned()
            .ok_or_else(|| Error::UnknownResolver(type_name.to_owned()))?;
        factory()
    }

    fn lock_plugins(&self) -> MutexGuard<'_, Vec<PluginRegistration>> {
        // A panic while holding the lock cannot leave the Vec half-updated.
        self.plugins.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ResolvedContent;
    use crate::context::ResolutionContext;
    use crate::plugin::PluginKind;
    use crate::properties::PropertyBag;
    use std::io::Write;
    use std::sync::Weak;

    fn kinds(registry: &Registry) -> Vec<PluginKind> {
        registry
            .snapshot()
            .iter()
            .map(|r| r.plugin().kind())
            .collect()
    }

    /// Collects formatted tracing output for assertions.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn capture_logs(f: impl FnOnce()) -> String {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        buffer.contents()
    }

    #[test]
    fn test_defaults_order() {
        let registry = Registry::with_defaults();
        assert_eq!(
            kinds(&registry),
            vec![
                PluginKind::Fragment,
                PluginKind::LocalFilesystem,
                PluginKind::XPointer,
                PluginKind::DirectHttp,
            ]
        );
    }

    #[test]
    fn test_register_front_and_back() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        registry.register(Arc::new(XPointerResolver::new()), false);
        registry.register(Arc::new(FragmentResolver::new()), true);
        registry.register(Arc::new(DirectHttpResolver::new()), false);
        assert_eq!(
            kinds(&registry),
            vec![
                PluginKind::Fragment,
                PluginKind::XPointer,
                PluginKind::DirectHttp
            ]
        );
    }

    #[test]
    fn test_duplicates_allowed() {
        let registry = Registry::new();
        let plugin: PluginHandle = Arc::new(FragmentResolver::new());
        registry.register(Arc::clone(&plugin), false);
        registry.register(plugin, false);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_by_name() {
        let registry = Registry::new();
        registry.register_all_by_name(["xpointer", "fragment"]);
        registry.register_by_name("local-filesystem", true);
        assert_eq!(
            kinds(&registry),
            vec![
                PluginKind::LocalFilesystem,
                PluginKind::XPointer,
                PluginKind::Fragment
            ]
        );
    }

    #[test]
    fn test_unknown_name_is_skipped_with_warning() {
        let registry = Registry::with_defaults();
        let before = registry.len();
        let logs = capture_logs(|| registry.register_by_name("does.not.Exist", false));
        assert_eq!(registry.len(), before);
        assert!(logs.contains("WARN"), "logs: {logs}");
        assert!(logs.contains("does.not.Exist"), "logs: {logs}");
    }

    #[test]
    fn test_failing_factory_is_skipped() {
        let registry = Registry::new();
        registry.register_factory("broken", || {
            Err(Error::Instantiation("backend unavailable".into()))
        });
        let logs = capture_logs(|| registry.register_by_name("broken", true));
        assert!(registry.is_empty());
        assert!(logs.contains("backend unavailable"), "logs: {logs}");
    }

    #[test]
    fn test_snapshot_is_point_in_time() {
        let registry = Registry::new();
        registry.register(Arc::new(FragmentResolver::new()), false);
        let snapshot = registry.snapshot();
        registry.register(Arc::new(XPointerResolver::new()), false);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_registration_records_thread_safety() {
        let registry = Registry::with_defaults();
        assert!(registry.snapshot().iter().all(|r| r.is_thread_safe()));
    }

    #[test]
    fn test_default_instance_is_shared() {
        let a = Registry::default_instance();
        let b = Registry::default_instance();
        assert!(std::ptr::eq(a, b));
        assert!(a.len() >= 4);
    }

    /// Calls back into its own registry while being matched and invoked.
    struct ReentrantPlugin {
        registry: Weak<Registry>,
        seen_len: Mutex<Vec<usize>>,
        properties: PropertyBag,
    }

    impl ResolverPlugin for ReentrantPlugin {
        fn name(&self) -> &str {
            "ReentrantPlugin"
        }

        fn kind(&self) -> PluginKind {
            PluginKind::Custom
        }

        fn can_resolve(&self, _ctx: &ResolutionContext) -> bool {
            if let Some(registry) = self.registry.upgrade() {
                self.seen_len.lock().unwrap().push(registry.len());
                registry.register(Arc::new(FragmentResolver::new()), false);
            }
            true
        }

        fn resolve(&self, _ctx: &ResolutionContext) -> Result<ResolvedContent, Error> {
            let len = self.registry.upgrade().map_or(0, |r| r.len());
            Ok(ResolvedContent::octets(len.to_string().into_bytes()))
        }

        fn is_thread_safe(&self) -> bool {
            true
        }

        fn fresh_instance(&self) -> Result<Box<dyn ResolverPlugin>, Error> {
            Err(Error::Instantiation("shared instance only".into()))
        }

        fn properties(&self) -> &PropertyBag {
            &self.properties
        }

        fn properties_mut(&mut self) -> &mut PropertyBag {
            &mut self.properties
        }
    }

    #[test]
    fn test_lock_released_while_plugins_run() {
        let registry = Arc::new(Registry::new());
        let plugin = Arc::new(ReentrantPlugin {
            registry: Arc::downgrade(&registry),
            seen_len: Mutex::new(Vec::new()),
            properties: PropertyBag::new(),
        });
        let handle: PluginHandle = plugin.clone();
        registry.register(handle, false);

        let ctx = ResolutionContext::new(Some("urn:anything"), "", false);
        let content = registry.resolve(&ctx, None).unwrap();

        assert_eq!(*plugin.seen_len.lock().unwrap(), vec![1]);
        assert_eq!(content.to_bytes().unwrap(), b"2");
        assert_eq!(registry.len(), 2);
    }
}
