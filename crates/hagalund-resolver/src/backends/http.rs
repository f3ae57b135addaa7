#![forbid(unsafe_code)]

//! Direct HTTP resolver.
//!
//! Fetches `http:`/`https:` references with a blocking `reqwest` client.
//! Proxy, basic authentication and timeouts come from the resolver's
//! property bag; without a proxy property no proxy is used at all, the
//! environment included.

use crate::content::ResolvedContent;
use crate::context::ResolutionContext;
use crate::plugin::{PluginKind, ResolverPlugin};
use crate::properties::PropertyBag;
use crate::uri;
use hagalund_core::Error;
use std::time::Duration;
use tracing::debug;

pub const PROXY_HOST: &str = "http.proxy.host";
pub const PROXY_PORT: &str = "http.proxy.port";
pub const PROXY_USERNAME: &str = "http.proxy.username";
pub const PROXY_PASSWORD: &str = "http.proxy.password";
pub const BASIC_USERNAME: &str = "http.basic.username";
pub const BASIC_PASSWORD: &str = "http.basic.password";
/// Connect timeout in milliseconds.
pub const CONNECT_TIMEOUT: &str = "http.connect.timeout";
/// Whole-request timeout in milliseconds.
pub const READ_TIMEOUT: &str = "http.read.timeout";

const SUPPORTED_PROPERTIES: [&str; 8] = [
    PROXY_HOST,
    PROXY_PORT,
    PROXY_USERNAME,
    PROXY_PASSWORD,
    BASIC_USERNAME,
    BASIC_PASSWORD,
    CONNECT_TIMEOUT,
    READ_TIMEOUT,
];

const DEFAULT_PROXY_PORT: u16 = 80;

#[derive(Debug, Clone, Default)]
pub struct DirectHttpResolver {
    properties: PropertyBag,
}

impl DirectHttpResolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn numeric_property<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>, Error> {
        self.properties
            .get(key)
            .map(|value| {
                value.trim().parse().map_err(|_| Error::InvalidProperty {
                    key: key.to_owned(),
                    reason: format!("not a number: {value}"),
                })
            })
            .transpose()
    }

    fn client(&self) -> Result<reqwest::blocking::Client, Error> {
        let mut builder = reqwest::blocking::Client::builder();

        if let Some(ms) = self.numeric_property::<u64>(CONNECT_TIMEOUT)? {
            builder = builder.connect_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.numeric_property::<u64>(READ_TIMEOUT)? {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        match self.properties.get(PROXY_HOST) {
            Some(host) => {
                let port = self
                    .numeric_property::<u16>(PROXY_PORT)?
                    .unwrap_or(DEFAULT_PROXY_PORT);
                let mut proxy = reqwest::Proxy::all(format!("http://{host}:{port}"))
                    .map_err(|e| Error::Http(format!("invalid proxy {host}:{port}: {e}")))?;
                if let (Some(user), Some(pass)) = (
                    self.properties.get(PROXY_USERNAME),
                    self.properties.get(PROXY_PASSWORD),
                ) {
                    proxy = proxy.basic_auth(user, pass);
                }
                builder = builder.proxy(proxy);
            }
            None => builder = builder.no_proxy(),
        }

        builder.build().map_err(|e| Error::Http(e.to_string()))
    }
}

impl ResolverPlugin for DirectHttpResolver {
    fn name(&self) -> &str {
        "DirectHttpResolver"
    }

    fn kind(&self) -> PluginKind {
        PluginKind::DirectHttp
    }

    fn can_resolve(&self, ctx: &ResolutionContext) -> bool {
        let Some(reference) = ctx.uri() else {
            return false;
        };
        if uri::is_same_document(reference) || reference.starts_with("xpointer(") {
            return false;
        }
        is_http(reference) || is_http(ctx.base_uri())
    }

    fn resolve(&self, ctx: &ResolutionContext) -> Result<ResolvedContent, Error> {
        let reference = ctx
            .uri()
            .ok_or_else(|| Error::InvalidUri("HTTP resolver needs a URI".into()))?;
        let url = uri::without_fragment(uri::join(ctx.base_uri(), reference)?);
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidUri(format!("not an HTTP URL: {url}")));
        }

        debug!(%url, "fetching referenced resource");
        let mut request = self.client()?.get(url.as_str());
        if let Some(user) = self.properties.get(BASIC_USERNAME) {
            request = request.basic_auth(user, self.properties.get(BASIC_PASSWORD));
        }

        let response = request
            .send()
            .map_err(|e| Error::Http(format!("{url}: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http(format!("{url}: server returned {status}")));
        }

        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let final_url = response.url().to_string();
        let body = response
            .bytes()
            .map_err(|e| Error::Http(format!("{url}: {e}")))?;

        let content = ResolvedContent::octets(body.to_vec()).with_source_uri(final_url);
        Ok(match mime {
            Some(mime) => content.with_mime_type(mime),
            None => content,
        })
    }

    fn is_thread_safe(&self) -> bool {
        true
    }

    fn fresh_instance(&self) -> Result<Box<dyn ResolverPlugin>, Error> {
        Ok(Box::new(self.clone()))
    }

    fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.properties
    }

    fn supported_properties(&self) -> &[&'static str] {
        &SUPPORTED_PROPERTIES
    }
}

fn is_http(uri: &str) -> bool {
    uri.starts_with("http:") || uri.starts_with("https:")
}
