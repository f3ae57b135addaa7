#![forbid(unsafe_code)]

//! Secure-mode gate.
//!
//! When secure validation is requested no resolver able to reach the local
//! filesystem or the network directly may be selected from the registry.
//! The forbidden set is fixed here and is not configurable.

use crate::plugin::{PluginKind, ResolverPlugin};

/// Plugin kinds that must never be selected in secure mode.
pub const FORBIDDEN_IN_SECURE_MODE: [PluginKind; 2] =
    [PluginKind::LocalFilesystem, PluginKind::DirectHttp];

/// Whether `kind` is in the forbidden set.
pub fn is_forbidden_kind(kind: PluginKind) -> bool {
    FORBIDDEN_IN_SECURE_MODE.contains(&kind)
}

/// Whether `plugin` may not be selected when secure mode is on.
pub fn is_forbidden_in_secure_mode(plugin: &dyn ResolverPlugin) -> bool {
    is_forbidden_kind(plugin.kind())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_set_is_closed() {
        assert!(is_forbidden_kind(PluginKind::LocalFilesystem));
        assert!(is_forbidden_kind(PluginKind::DirectHttp));
        assert!(!is_forbidden_kind(PluginKind::Fragment));
        assert!(!is_forbidden_kind(PluginKind::XPointer));
        assert!(!is_forbidden_kind(PluginKind::Anonymous));
        assert!(!is_forbidden_kind(PluginKind::Custom));
    }

    #[test]
    fn test_builtin_plugins() {
        use crate::backends::{
            DirectHttpResolver, FragmentResolver, LocalFilesystemResolver, XPointerResolver,
        };
        assert!(is_forbidden_in_secure_mode(&LocalFilesystemResolver::new()));
        assert!(is_forbidden_in_secure_mode(&DirectHttpResolver::new()));
        assert!(!is_forbidden_in_secure_mode(&FragmentResolver::new()));
        assert!(!is_forbidden_in_secure_mode(&XPointerResolver::new()));
    }
}
