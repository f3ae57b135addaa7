#![forbid(unsafe_code)]

/// Errors produced by the Hagalund document and resolver backends.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    #[error("invalid XML structure: {0}")]
    XmlStructure(String),

    #[error("invalid URI reference: {0}")]
    InvalidUri(String),

    #[error("ID not found: {0}")]
    IdNotFound(String),

    #[error("multiple elements share the ID '{0}'")]
    DuplicateId(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("missing source document for same-document reference: {0}")]
    MissingDocument(String),

    #[error("unknown resolver type: {0}")]
    UnknownResolver(String),

    #[error("cannot instantiate resolver: {0}")]
    Instantiation(String),

    #[error("invalid property {key}: {reason}")]
    InvalidProperty { key: String, reason: String },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
