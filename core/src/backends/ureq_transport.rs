//! Ureq-based transport.
//!
//! ureq is blocking, so each exchange runs on tokio's blocking pool. A
//! canceled exchange releases the caller immediately; the blocking call
//! itself finishes in the background, bounded by the agent's timeout, and
//! its response is dropped.

use std::time::Duration;

use bytes::Bytes;
use ureq::AsSendBody;

use crate::error::TransportError;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

/// An [`HttpTransport`] backed by a [`ureq`] agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// A transport whose exchanges time out after `timeout`, connect and
    /// body read included.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self::from_agent(agent)
    }

    /// Use a pre-configured agent. It must be built with
    /// `http_status_as_error(false)`.
    pub fn from_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl HttpTransport for UreqTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || exchange(&agent, request))
            .await
            .map_err(|e| TransportError::Other(Box::new(e)))?
    }
}

fn exchange(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    let HttpRequest {
        method,
        url,
        headers,
        body,
    } = request;

    let mut builder = http::Request::builder().method(method).uri(url.as_str());
    if let Some(map) = builder.headers_mut() {
        map.extend(headers);
    }

    let response = match body {
        Some(body) => run(agent, builder, body.to_vec())?,
        None => run(agent, builder, ())?,
    };

    let (parts, mut body) = response.into_parts();
    let body = body
        .read_to_vec()
        .map(Bytes::from)
        .map_err(transport_error);

    Ok(HttpResponse {
        status: parts.status,
        headers: parts.headers,
        body,
    })
}

fn run<B: AsSendBody>(
    agent: &ureq::Agent,
    builder: http::request::Builder,
    body: B,
) -> Result<http::Response<ureq::Body>, TransportError> {
    let request = builder
        .body(body)
        .map_err(|e| TransportError::Other(Box::new(e)))?;
    agent.run(request).map_err(transport_error)
}

fn transport_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        ureq::Error::HostNotFound => TransportError::Connection("host not found".to_owned()),
        ureq::Error::Io(e) => TransportError::Connection(e.to_string()),
        err => TransportError::Other(Box::new(err)),
    }
}
