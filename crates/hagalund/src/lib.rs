#![forbid(unsafe_code)]

//! Hagalund: URI reference resolution for XML signatures.
//!
//! Re-exports the layers of the library and provides the helpers the
//! command-line tool is built from.

pub use hagalund_core as core;
pub use hagalund_resolver as resolver;
pub use hagalund_xml as xml;

pub mod setup;
