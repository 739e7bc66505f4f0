//! Async client core for the EVE Online Swagger Interface (ESI).
//!
//! # Overview
//! Every endpoint call goes through one pipeline: `Client::new_request`
//! resolves the path against the base URL and encodes the body,
//! `Client::dispatch` sends it over an injected [`HttpTransport`], classifies
//! the response and either delivers the body to a [`Destination`] or returns
//! a structured [`ApiError`] while recording the server's error rate limit.
//!
//! # Design
//! - The transport is a trait, injected as `Arc<T>` and shareable between
//!   clients. Authentication and caching belong to the transport.
//! - The last reported [`Rate`] is the only state mutated by concurrent calls
//!   and is guarded by a mutex owned by the client.
//! - Reset instants come from an injectable [`Clock`].
//! - Every exchange takes a [`Context`] for cancellation and deadlines.
//! - No retries; every failure is returned to the caller.

pub mod backends;
pub mod classify;
pub mod client;
pub mod clock;
pub mod context;
pub mod dispatch;
pub mod endpoints;
pub mod error;
pub mod options;
pub mod rate;
pub mod request;
pub mod response;
pub mod timestamp;
pub mod transport;
pub mod types;

#[cfg(feature = "reqwest-client")]
pub use backends::ReqwestTransport;
#[cfg(feature = "ureq-client")]
pub use backends::UreqTransport;
pub use client::{Client, ClientBuilder, ClientConfig, LogSink, Logging};
pub use clock::{Clock, FixedClock, SystemClock};
pub use context::Context;
pub use dispatch::{DecodeTarget, Destination};
pub use endpoints::{CharactersEndpoint, FleetsEndpoint};
pub use error::{ApiError, Error, TransportError};
pub use options::{add_options, I18nOptions};
pub use rate::Rate;
pub use response::Response;
pub use timestamp::Timestamp;
pub use transport::{HttpRequest, HttpResponse, HttpTransport};
pub use types::{
    CharacterFleet, CharacterPublicInfo, Fleet, FleetInvitation, FleetMember,
    FleetMemberMovement, FleetSettings, FleetSquad, FleetWing,
};

/// A client over the default reqwest transport.
#[cfg(feature = "reqwest-client")]
pub type Esi = Client<ReqwestTransport>;
