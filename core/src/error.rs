//! Error types for the ESI client.
//!
//! # Design
//! Failures fall into four groups: building the request (`InvalidMethod`,
//! `InvalidUrl`, `UrlEscapesBase`, `InvalidUserAgent`, `Encoding`,
//! `Options`), executing it (`Transport`, `Canceled`, `DeadlineExceeded`),
//! non-2xx responses (`Api`) and consuming a successful body (`Decode`,
//! `Sink`). Only `Api` carries a
//! rate snapshot; nothing else reached the server or got an answer.

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::rate::Rate;
use crate::response::Response;

/// Errors returned by `Client` and the endpoint wrappers.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid method {0:?}")]
    InvalidMethod(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The path resolved outside the configured base URL.
    #[error("{resolved} is outside of the base URL {base}")]
    UrlEscapesBase { base: Url, resolved: Url },

    #[error("invalid user agent {0:?}")]
    InvalidUserAgent(String),

    #[error("failed to encode request body: {0}")]
    Encoding(#[source] serde_json::Error),

    #[error("invalid query options: {0}")]
    Options(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("request canceled")]
    Canceled,

    #[error("request deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to write response body: {0}")]
    Sink(#[source] std::io::Error),
}

impl Error {
    /// The structured API error, if the server answered with a non-2xx status.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }

    /// True for caller-initiated cancellation and deadline expiry.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Error::Canceled | Error::DeadlineExceeded(_))
    }
}

/// A non-2xx response from ESI.
///
/// Displays as the server's error message only, which is empty when the
/// body was absent or not of the form `{"error": "..."}`.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    pub rate: Rate,
    pub response: Response,
}

/// Failures reported by an `HttpTransport` before any response was received.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection error: {0}")]
    Connection(String),

    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}
