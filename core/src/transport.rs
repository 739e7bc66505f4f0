//! HTTP transport types and the pluggable transport seam.
//!
//! # Design
//! Requests and responses are plain data. The core builds `HttpRequest`
//! values and classifies `HttpResponse` values; the network round-trip is
//! delegated to an injected `HttpTransport`. Authentication, caching and any
//! other transport concerns live in the embedding application's
//! implementation of that trait.
//!
//! A response body is owned `Bytes` and is moved into exactly one consumer
//! (the classifier on failure, the destination on success), so it is
//! released once on every exit path. Reading the body can fail after the
//! status line and headers arrived; the outcome travels with the response
//! so a failed exchange still yields its status and rate headers.

use std::future::Future;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use url::Url;

use crate::error::TransportError;

/// An outgoing request. Immutable once built by `Client::new_request`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// A raw response as returned by a transport.
///
/// `body` is `Err` when the connection broke while reading it.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Result<Bytes, TransportError>,
}

/// Capability to execute one exchange.
///
/// Implementations must not treat non-2xx statuses as errors; the
/// classifier needs to see every response.
///
/// Cancellation drops the returned future, which must release the caller
/// promptly. Async transports such as `ReqwestTransport` abort the exchange
/// on drop. A blocking transport such as `UreqTransport` cannot: its call
/// keeps running in the background until it completes or hits the agent
/// timeout, and its response is discarded.
pub trait HttpTransport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}
