#![forbid(unsafe_code)]

//! Core types for the Hagalund URI resolution library.
//!
//! Holds the shared low-level error type and the XML namespace and
//! element-name constants used by the document and resolver layers.

pub mod error;
pub mod ns;

pub use error::{Error, Result};
