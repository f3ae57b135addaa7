#![forbid(unsafe_code)]

//! URI helpers shared by the resolver backends.
//!
//! Handles:
//! - Same-document references (`""`, `#...`) which are never joined
//! - Joining a reference against its base URI (RFC 3986)
//! - Dropping the fragment before a resource is fetched

use hagalund_core::Error;
use url::Url;

/// Whether `uri` refers into the current document.
pub fn is_same_document(uri: &str) -> bool {
    uri.is_empty() || uri.starts_with('#')
}

/// Resolve `reference` against `base_uri`.
///
/// An empty or non-absolute base is ignored, in which case the reference
/// itself must be absolute.
pub fn join(base_uri: &str, reference: &str) -> Result<Url, Error> {
    if !base_uri.is_empty() {
        if let Ok(base) = Url::parse(base_uri) {
            return base
                .join(reference)
                .map_err(|e| Error::InvalidUri(format!("{reference} (base {base_uri}): {e}")));
        }
    }
    Url::parse(reference).map_err(|e| Error::InvalidUri(format!("{reference}: {e}")))
}

/// Return `url` with its fragment removed.
pub fn without_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

/// Scheme of `reference` once resolved against `base_uri`, if it resolves.
pub fn resolved_scheme(base_uri: &str, reference: &str) -> Option<String> {
    join(base_uri, reference)
        .ok()
        .map(|url| url.scheme().to_owned())
}
