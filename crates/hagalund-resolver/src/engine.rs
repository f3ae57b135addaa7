#![forbid(unsafe_code)]

//! Resolver selection and dispatch.
//!
//! Selection order is part of the contract:
//! 1. Per-call candidates, in the order given.  These are a deliberate
//!    override by the caller and are not subject to the secure-mode gate.
//! 2. The registry, in registration order.  Plugins that are not
//!    thread-safe are replaced by a fresh instance for this call, and in
//!    secure mode a matching forbidden plugin ends the call with an error
//!    instead of falling through to the next one.

use crate::content::ResolvedContent;
use crate::context::ResolutionContext;
use crate::error::ResolutionFailure;
use crate::plugin::{PluginHandle, PluginKind, ResolverPlugin};
use crate::registry::Registry;
use crate::security;
use hagalund_core::Error;
use tracing::{debug, warn};

/// Where a selected resolver came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Candidate,
    Registry,
}

enum Handle {
    Shared(PluginHandle),
    Owned(Box<dyn ResolverPlugin>),
}

/// The resolver chosen for one call.
///
/// Holds either the shared registered instance (thread-safe plugins and
/// per-call candidates) or an instance owned by this call alone.
pub struct SelectedResolver {
    handle: Handle,
    origin: Origin,
}

impl SelectedResolver {
    fn shared(plugin: PluginHandle, origin: Origin) -> Self {
        Self {
            handle: Handle::Shared(plugin),
            origin,
        }
    }

    fn owned(plugin: Box<dyn ResolverPlugin>, origin: Origin) -> Self {
        Self {
            handle: Handle::Owned(plugin),
            origin,
        }
    }

    pub fn plugin(&self) -> &dyn ResolverPlugin {
        match &self.handle {
            Handle::Shared(plugin) => plugin.as_ref(),
            Handle::Owned(plugin) => plugin.as_ref(),
        }
    }

    pub fn kind(&self) -> PluginKind {
        self.plugin().kind()
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Whether this call has its own plugin instance.
    pub fn is_owned(&self) -> bool {
        matches!(self.handle, Handle::Owned(_))
    }

    /// Set a property on the selected plugin for this call only.
    ///
    /// A shared instance is first replaced by a fresh one, so the write
    /// never reaches the registry or other callers.
    pub fn set_property(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.make_owned()?.set_property(key, value);
        Ok(())
    }

    pub fn get_property(&self, key: &str) -> Option<String> {
        self.plugin().get_property(key)
    }

    pub fn understands(&self, key: &str) -> bool {
        self.plugin().understands(key)
    }

    /// Dereference `ctx` with the selected plugin.
    pub fn resolve(&self, ctx: &ResolutionContext) -> Result<ResolvedContent, ResolutionFailure> {
        let plugin = self.plugin();
        plugin.resolve(ctx).map_err(|e| {
            debug!(resolver = plugin.name(), error = %e, "resolver failed");
            ResolutionFailure::resolver_failed(plugin.kind(), ctx, e)
        })
    }

    fn make_owned(&mut self) -> Result<&mut dyn ResolverPlugin, Error> {
        if let Handle::Shared(plugin) = &self.handle {
            let fresh = plugin.fresh_instance()?;
            self.handle = Handle::Owned(fresh);
        }
        match &mut self.handle {
            Handle::Owned(plugin) => Ok(plugin.as_mut()),
            Handle::Shared(plugin) => Err(Error::Instantiation(format!(
                "{} could not be detached from the registry",
                plugin.name()
            ))),
        }
    }
}

/// Pick the resolver for `ctx` without invoking it.
pub fn select(
    registry: &Registry,
    ctx: &ResolutionContext,
    candidates: Option<&[PluginHandle]>,
) -> Result<SelectedResolver, ResolutionFailure> {
    if let Some(candidates) = candidates {
        if let Some(plugin) = candidates.iter().find(|p| p.can_resolve(ctx)) {
            debug!(
                resolver = plugin.name(),
                uri = ctx.uri(),
                "selected per-call resolver"
            );
            return Ok(SelectedResolver::shared(PluginHandle::clone(plugin), Origin::Candidate));
        }
    }

    for registration in registry.snapshot() {
        let plugin = registration.plugin();
        let selected = if registration.is_thread_safe() {
            SelectedResolver::shared(PluginHandle::clone(plugin), Origin::Registry)
        } else {
            let fresh = plugin
                .fresh_instance()
                .map_err(|e| ResolutionFailure::instantiation(plugin.kind(), ctx, e))?;
            SelectedResolver::owned(fresh, Origin::Registry)
        };

        if !selected.plugin().can_resolve(ctx) {
            continue;
        }

        if ctx.is_secure() && security::is_forbidden_in_secure_mode(selected.plugin()) {
            warn!(
                resolver = selected.plugin().name(),
                uri = ctx.uri(),
                base_uri = ctx.base_uri(),
                "resolver forbidden in secure mode"
            );
            return Err(ResolutionFailure::forbidden(selected.kind(), ctx));
        }

        debug!(
            resolver = selected.plugin().name(),
            uri = ctx.uri(),
            owned = selected.is_owned(),
            "selected registered resolver"
        );
        return Ok(selected);
    }

    Err(ResolutionFailure::no_resolver(ctx))
}

/// Select a resolver for `ctx` and dereference it.
pub fn resolve(
    registry: &Registry,
    ctx: &ResolutionContext,
    candidates: Option<&[PluginHandle]>,
) -> Result<ResolvedContent, ResolutionFailure> {
    select(registry, ctx, candidates)?.resolve(ctx)
}

impl Registry {
    /// See [`select`].
    pub fn select(
        &self,
        ctx: &ResolutionContext,
        candidates: Option<&[PluginHandle]>,
    ) -> Result<SelectedResolver, ResolutionFailure> {
        select(self, ctx, candidates)
    }

    /// See [`resolve`].
    pub fn resolve(
        &self,
        ctx: &ResolutionContext,
        candidates: Option<&[PluginHandle]>,
    ) -> Result<ResolvedContent, ResolutionFailure> {
        resolve(self, ctx, candidates)
    }
}
