//! Executing requests and delivering response bodies.
//!
//! # Design
//! `Client::dispatch` is the one place every exchange goes through. The
//! transport future is raced against the caller's `Context`; a canceled or
//! expired exchange is dropped before any response exists, so the rate state
//! is left alone. A completed exchange is classified, failed ones record
//! their rate snapshot, and successful bodies go to the destination.

use std::io::Write;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::classify::classify;
use crate::client::Client;
use crate::context::Context;
use crate::error::Error;
use crate::response::Response;
use crate::transport::{HttpRequest, HttpTransport};

/// Something a JSON body can be decoded into in place.
pub trait DecodeTarget: Send {
    fn decode(&mut self, body: &[u8]) -> Result<(), serde_json::Error>;
}

impl<T> DecodeTarget for T
where
    T: DeserializeOwned + Send,
{
    fn decode(&mut self, body: &[u8]) -> Result<(), serde_json::Error> {
        *self = serde_json::from_slice(body)?;
        Ok(())
    }
}

/// Where a successful response body goes.
pub enum Destination<'a> {
    /// Drop the body.
    Discard,
    /// Copy the raw bytes into a writer.
    Raw(&'a mut (dyn Write + Send)),
    /// Decode the body as JSON. An empty body leaves the target untouched.
    Json(&'a mut dyn DecodeTarget),
}

impl<'a> Destination<'a> {
    pub fn raw<W: Write + Send>(writer: &'a mut W) -> Self {
        Destination::Raw(writer)
    }

    pub fn json<T: DecodeTarget>(target: &'a mut T) -> Self {
        Destination::Json(target)
    }
}

impl<T: HttpTransport> Client<T> {
    /// Send `request` and deliver a successful body to `destination`.
    ///
    /// Non-2xx responses return [`Error::Api`] and update [`Client::rate`],
    /// even when their body could not be read. Transport failures,
    /// including a broken body on a 2xx response, cancellation and deadline
    /// expiry are returned as-is without touching the rate state.
    pub async fn dispatch(
        &self,
        ctx: &Context,
        request: HttpRequest,
        destination: Destination<'_>,
    ) -> Result<Response, Error> {
        if ctx.is_canceled() {
            return Err(Error::Canceled);
        }

        let method = request.method.clone();
        let url = request.url.clone();

        let raw = tokio::select! {
            biased;
            () = ctx.cancelled() => return Err(Error::Canceled),
            timeout = ctx.expired() => return Err(Error::DeadlineExceeded(timeout)),
            result = self.transport.send(request) => result?,
        };

        self.logging
            .log_debug(format_args!("{method} {url}: {}", raw.status));

        let (response, body) = match classify(raw, self.clock.now()) {
            Ok(parts) => parts,
            Err(err) => {
                self.rate.record(err.rate);
                return Err(err.into());
            }
        };

        if let Some(warning) = response.warning() {
            self.logging.log_warn(format_args!(
                "warning header received ({method} {}): {warning}",
                url.path()
            ));
        }

        let body = body?;

        match destination {
            Destination::Discard => {}
            Destination::Raw(writer) => writer.write_all(&body).map_err(Error::Sink)?,
            Destination::Json(target) => {
                if !body.trim_ascii().is_empty() {
                    target.decode(&body).map_err(Error::Decode)?;
                }
            }
        }

        Ok(response)
    }

    /// Build and dispatch a request, decoding the body into a fresh `R`.
    ///
    /// An empty body yields `R::default()`.
    pub async fn call<B, R>(
        &self,
        ctx: &Context,
        method: impl AsRef<str>,
        path: &str,
        body: Option<&B>,
    ) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned + Default + Send,
    {
        let request = self.new_request(method, path, body)?;
        let mut value = R::default();
        self.dispatch(ctx, request, Destination::json(&mut value))
            .await?;
        Ok(value)
    }

    /// Build and dispatch a request whose response body is not needed.
    pub async fn exec<B>(
        &self,
        ctx: &Context,
        method: impl AsRef<str>,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, Error>
    where
        B: Serialize + ?Sized,
    {
        let request = self.new_request(method, path, body)?;
        self.dispatch(ctx, request, Destination::Discard).await
    }
}
