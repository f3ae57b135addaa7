#![forbid(unsafe_code)]

//! URI reference resolution for the Hagalund XML Security library.
//!
//! A signature reference names its data by URI.  Before a digest can be
//! computed the reference has to be dereferenced into content.  This crate
//! holds the pieces that decide *who* does that:
//!
//! - [`Registry`]: ordered set of resolver plugins, first match wins
//! - [`engine`]: walks per-call candidates, then the registry, and adapts
//!   plugins that are not thread-safe by asking them for a fresh instance
//! - [`security`]: the secure-mode gate forbidding filesystem and direct
//!   network resolvers
//! - [`backends`]: the built-in fragment, XPointer, local filesystem,
//!   direct HTTP and anonymous resolvers

pub mod backends;
pub mod content;
pub mod context;
pub mod engine;
pub mod error;
pub mod plugin;
pub mod properties;
pub mod registry;
pub mod security;
pub mod uri;

pub use content::{ContentData, ResolvedContent};
pub use context::ResolutionContext;
pub use engine::{resolve, select, Origin, SelectedResolver};
pub use error::{FailureKind, ResolutionFailure, Result};
pub use plugin::{PluginHandle, PluginKind, ResolverPlugin};
pub use properties::PropertyBag;
pub use registry::{PluginRegistration, Registry, ResolverFactory};
