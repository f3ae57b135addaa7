#![forbid(unsafe_code)]

//! XML document layer for the Hagalund resolver library.
//!
//! Provides an owned document wrapper over `roxmltree` with ID attribute
//! registration, the `NodeSet` handed out by same-document resolvers, and
//! parsing of the bare-name and XPointer reference forms.

pub mod document;
pub mod nodeset;
pub mod xpath;

pub use document::XmlDocument;
pub use nodeset::NodeSet;

/// Return roxmltree parsing options that allow DTD.
///
/// DTD is allowed because roxmltree does not expand external entities or
/// perform entity substitution beyond the five predefined XML entities,
/// so it is safe. Many signature test vectors declare ID attributes in a DTD.
pub fn parsing_options() -> roxmltree::ParsingOptions {
    roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    }
}
