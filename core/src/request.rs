//! Request construction.
//!
//! # Design
//! Paths are resolved against the configured base with standard URL
//! reference resolution, then checked to still live under that base. An
//! absolute endpoint path (`/v1/...`) or a cross-host URL would otherwise
//! silently drop the base path or repoint the request at another host.

use bytes::Bytes;
use http::header::{HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, Method};
use serde::Serialize;
use url::Url;

use crate::error::Error;
use crate::transport::HttpRequest;

/// Resolve `path` against `base`, refusing results outside of `base`.
pub fn resolve(base: &Url, path: &str) -> Result<Url, Error> {
    let resolved = base.join(path)?;

    let same_origin = resolved.scheme() == base.scheme()
        && resolved.host_str() == base.host_str()
        && resolved.port_or_known_default() == base.port_or_known_default();

    if !same_origin || !resolved.path().starts_with(base.path()) {
        return Err(Error::UrlEscapesBase {
            base: base.clone(),
            resolved,
        });
    }

    Ok(resolved)
}

/// Build an `HttpRequest` for `method` on `path` relative to `base`.
///
/// `Content-Type` is only set when a body is present; `Accept` is always set
/// and `User-Agent` whenever a non-empty one is configured.
pub fn build_request<B>(
    base: &Url,
    user_agent: Option<&str>,
    method: &str,
    path: &str,
    body: Option<&B>,
) -> Result<HttpRequest, Error>
where
    B: Serialize + ?Sized,
{
    let method =
        Method::from_bytes(method.as_bytes()).map_err(|_| Error::InvalidMethod(method.to_string()))?;
    let url = resolve(base, path)?;

    let body = body
        .map(|b| serde_json::to_vec(b).map(Bytes::from))
        .transpose()
        .map_err(Error::Encoding)?;

    let mut headers = HeaderMap::new();
    if body.is_some() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if let Some(agent) = user_agent.filter(|a| !a.is_empty()) {
        let value =
            HeaderValue::from_str(agent).map_err(|_| Error::InvalidUserAgent(agent.to_string()))?;
        headers.insert(USER_AGENT, value);
    }

    Ok(HttpRequest {
        method,
        url,
        headers,
        body,
    })
}
