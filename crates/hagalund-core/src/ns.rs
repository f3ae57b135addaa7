#![forbid(unsafe_code)]

//! XML namespace constants used across the library.

/// XML Digital Signature namespace
pub const DSIG: &str = "http://www.w3.org/2000/09/xmldsig#";

// ── Element names ────────────────────────────────────────────────────

pub mod node {
    pub const REFERENCE: &str = "Reference";
}

// ── Attribute names ──────────────────────────────────────────────────

pub mod attr {
    pub const URI: &str = "URI";
}

/// Attribute names treated as IDs when no extra ones are registered.
pub const DEFAULT_ID_ATTRS: [&str; 3] = ["Id", "ID", "id"];
