//! Response metadata returned from every completed exchange.

use http::{HeaderMap, StatusCode};

/// Deprecation notices arrive in this header on successful responses.
pub const HEADER_WARNING: &str = "warning";

/// Status and headers of a completed exchange. The body has already been
/// handed to the destination (or the classifier) by the time callers see it.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl Response {
    pub fn new(status: StatusCode, headers: HeaderMap) -> Self {
        Self { status, headers }
    }

    /// The `warning` header, if the route is deprecated.
    pub fn warning(&self) -> Option<&str> {
        self.headers
            .get(HEADER_WARNING)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    }
}
