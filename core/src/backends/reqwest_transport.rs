//! Reqwest-based transport.

use std::time::Duration;

use crate::error::TransportError;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

/// An [`HttpTransport`] backed by [`reqwest`].
///
/// Wrap a pre-configured `reqwest::Client` (authentication middleware,
/// proxies, caching) with [`ReqwestTransport::from_client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// A transport whose exchanges time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport_error)?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let outgoing = self.client.request(method, url).headers(headers);
        let outgoing = match body {
            Some(body) => outgoing.body(body),
            None => outgoing,
        };

        let response = outgoing.send().await.map_err(transport_error)?;
        let status = response.status();
        let headers = response.headers().clone();

        // Status and headers are already in hand; a broken body is left for
        // the classifier to judge.
        let body = response.bytes().await.map_err(transport_error);

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn transport_error(err: reqwest::Error) -> TransportError {
    match err {
        err if err.is_timeout() => TransportError::Timeout,
        err if err.is_connect() => TransportError::Connection(err.to_string()),
        err => TransportError::Other(Box::new(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_timeout() {
        assert!(ReqwestTransport::new(Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn timeouts_map_to_timeout_variant() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = url::Url::parse(&format!("http://{}/", listener.local_addr().unwrap())).unwrap();
        let transport = ReqwestTransport::new(Duration::from_millis(100)).unwrap();

        let err = rt
            .block_on(transport.send(HttpRequest {
                method: http::Method::GET,
                url,
                headers: http::HeaderMap::new(),
                body: None,
            }))
            .unwrap_err();
        assert!(matches!(err, TransportError::Timeout));
        drop(listener);
    }
}
