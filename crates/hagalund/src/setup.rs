#![forbid(unsafe_code)]

//! Registry setup and document helpers used by the CLI.

use hagalund_core::ns;
use hagalund_core::Error;
use hagalund_resolver::backends::{
    DirectHttpResolver, FragmentResolver, LocalFilesystemResolver, XPointerResolver,
};
use hagalund_resolver::{Registry, ResolverPlugin};
use hagalund_xml::XmlDocument;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;
use url::Url;

/// Parse a `KEY=VALUE` property argument.
pub fn parse_property(arg: &str) -> Result<(String, String), Error> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.to_owned()))
        }
        _ => Err(Error::InvalidProperty {
            key: arg.to_owned(),
            reason: "expected KEY=VALUE".into(),
        }),
    }
}

/// Build a registry holding the default resolvers, in default order, with
/// each property set on every resolver that understands it.
///
/// Properties no resolver understands are reported and ignored.
pub fn configured_registry(properties: &[(String, String)]) -> Registry {
    let mut plugins: Vec<Box<dyn ResolverPlugin>> = vec![
        Box::new(FragmentResolver::new()),
        Box::new(LocalFilesystemResolver::new()),
        Box::new(XPointerResolver::new()),
        Box::new(DirectHttpResolver::new()),
    ];

    for (key, value) in properties {
        let mut understood = false;
        for plugin in plugins.iter_mut().filter(|p| p.understands(key)) {
            plugin.set_property(key, value);
            understood = true;
        }
        if !understood {
            warn!(key = key.as_str(), "no resolver understands property");
        }
    }

    let registry = Registry::new();
    for plugin in plugins {
        registry.register(Arc::from(plugin), false);
    }
    registry
}

/// Load an XML document, registering extra ID attribute names.
pub fn load_document(path: &Path, id_attrs: &[String]) -> Result<XmlDocument, Error> {
    let data = std::fs::read(path)?;
    let mut doc = XmlDocument::parse_bytes(&data)?;
    for attr in id_attrs {
        doc.add_id_attr(attr);
    }
    Ok(doc)
}

/// `file:` URI of a document on disk, for use as a base URI.
pub fn file_base_uri(path: &Path) -> Result<String, Error> {
    let absolute = std::fs::canonicalize(path)?;
    Url::from_file_path(&absolute)
        .map(String::from)
        .map_err(|()| Error::InvalidUri(format!("cannot express {} as a URI", absolute.display())))
}

/// The `URI` attribute of every `ds:Reference` in the document, in
/// document order.  A reference without the attribute yields `None`.
pub fn signature_references(doc: &XmlDocument) -> Result<Vec<Option<String>>, Error> {
    let parsed = doc.parse_doc()?;
    Ok(
        XmlDocument::find_elements(&parsed, ns::DSIG, ns::node::REFERENCE)
            .into_iter()
            .map(|node| node.attribute(ns::attr::URI).map(str::to_owned))
            .collect(),
    )
}
