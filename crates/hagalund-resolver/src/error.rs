#![forbid(unsafe_code)]

//! Failures surfaced by a resolution call.

use crate::context::ResolutionContext;
use crate::plugin::PluginKind;
use hagalund_core::Error;
use std::fmt;

/// What went wrong during a resolution call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No candidate or registered plugin claimed the reference.
    NoResolverFound,
    /// A matching plugin exists but is not allowed in secure mode.
    ForbiddenResolverInSecureMode { plugin_kind: PluginKind },
    /// A fresh instance of a plugin that is not thread-safe could not be made.
    InstantiationFailure { plugin_kind: PluginKind },
    /// The selected plugin failed to produce content.
    ResolverFailed { plugin_kind: PluginKind },
}

impl FailureKind {
    /// The plugin kind involved, if the failure concerns one plugin.
    pub fn plugin_kind(&self) -> Option<PluginKind> {
        match self {
            FailureKind::NoResolverFound => None,
            FailureKind::ForbiddenResolverInSecureMode { plugin_kind }
            | FailureKind::InstantiationFailure { plugin_kind }
            | FailureKind::ResolverFailed { plugin_kind } => Some(*plugin_kind),
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::NoResolverFound => f.write_str("no resolver found"),
            FailureKind::ForbiddenResolverInSecureMode { plugin_kind } => {
                write!(f, "{plugin_kind} resolver is forbidden in secure mode")
            }
            FailureKind::InstantiationFailure { plugin_kind } => {
                write!(f, "cannot instantiate {plugin_kind} resolver")
            }
            FailureKind::ResolverFailed { plugin_kind } => {
                write!(f, "{plugin_kind} resolver failed")
            }
        }
    }
}

/// A failed resolution, carrying the reference for diagnostics.
#[derive(Debug, thiserror::Error)]
#[error("{kind}: URI {} (base URI \"{base_uri}\")", .uri.as_deref().unwrap_or("<none>"))]
pub struct ResolutionFailure {
    pub kind: FailureKind,
    pub uri: Option<String>,
    pub base_uri: String,
    #[source]
    pub cause: Option<Error>,
}

/// Result of a resolution call.
pub type Result<T> = std::result::Result<T, ResolutionFailure>;

impl ResolutionFailure {
    fn new(kind: FailureKind, ctx: &ResolutionContext, cause: Option<Error>) -> Self {
        Self {
            kind,
            uri: ctx.uri().map(str::to_owned),
            base_uri: ctx.base_uri().to_owned(),
            cause,
        }
    }

    pub fn no_resolver(ctx: &ResolutionContext) -> Self {
        Self::new(FailureKind::NoResolverFound, ctx, None)
    }

    pub fn forbidden(plugin_kind: PluginKind, ctx: &ResolutionContext) -> Self {
        Self::new(
            FailureKind::ForbiddenResolverInSecureMode { plugin_kind },
            ctx,
            None,
        )
    }

    pub fn instantiation(plugin_kind: PluginKind, ctx: &ResolutionContext, cause: Error) -> Self {
        Self::new(
            FailureKind::InstantiationFailure { plugin_kind },
            ctx,
            Some(cause),
        )
    }

    pub fn resolver_failed(plugin_kind: PluginKind, ctx: &ResolutionContext, cause: Error) -> Self {
        Self::new(FailureKind::ResolverFailed { plugin_kind }, ctx, Some(cause))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_no_resolver_message() {
        let ctx = ResolutionContext::new(Some("urn:x"), "doc.xml", false);
        let failure = ResolutionFailure::no_resolver(&ctx);
        assert_eq!(failure.kind, FailureKind::NoResolverFound);
        assert_eq!(failure.kind.plugin_kind(), None);
        assert_eq!(
            failure.to_string(),
            "no resolver found: URI urn:x (base URI \"doc.xml\")"
        );
        assert!(failure.source().is_none());
    }

    #[test]
    fn test_absent_uri_message() {
        let ctx = ResolutionContext::new(None, "", false);
        let failure = ResolutionFailure::no_resolver(&ctx);
        assert_eq!(failure.uri, None);
        assert!(failure.to_string().contains("URI <none>"));
    }

    #[test]
    fn test_forbidden_carries_kind() {
        let ctx = ResolutionContext::new(Some("file:///etc/passwd"), "", true);
        let failure = ResolutionFailure::forbidden(PluginKind::LocalFilesystem, &ctx);
        assert_eq!(
            failure.kind.plugin_kind(),
            Some(PluginKind::LocalFilesystem)
        );
        assert!(failure
            .to_string()
            .starts_with("local-filesystem resolver is forbidden in secure mode"));
    }

    #[test]
    fn test_cause_is_source() {
        let ctx = ResolutionContext::new(Some("#a"), "", false);
        let failure = ResolutionFailure::resolver_failed(
            PluginKind::Fragment,
            &ctx,
            Error::IdNotFound("a".into()),
        );
        assert_eq!(failure.source().unwrap().to_string(), "ID not found: a");
    }

    #[test]
    fn test_result_alias_carries_failure() {
        fn lookup(ctx: &ResolutionContext) -> Result<()> {
            Err(ResolutionFailure::no_resolver(ctx))
        }
        let ctx = ResolutionContext::new(Some("urn:y"), "", false);
        let failure = lookup(&ctx).unwrap_err();
        assert_eq!(failure.uri.as_deref(), Some("urn:y"));
    }
}
