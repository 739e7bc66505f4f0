//! The ESI client: configuration, logging hooks and shared rate state.
//!
//! # Design
//! `Client` owns everything that is shared between calls: the injected
//! transport, the base URL and user agent, the logging hooks, the clock and
//! the last reported error rate. Endpoint wrappers borrow it. Configuration
//! setters take `&mut self`, so once a client is shared behind an `Arc` its
//! configuration is frozen and concurrent calls read it without locking.
//! The rate state is the only thing written by concurrent calls and sits
//! behind its own mutex.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use url::Url;

use crate::clock::{Clock, SystemClock};
use crate::endpoints::{CharactersEndpoint, FleetsEndpoint};
use crate::error::Error;
use crate::rate::{Rate, RateState};
use crate::request::build_request;
use crate::transport::{HttpRequest, HttpTransport};

/// The public ESI API.
pub const DEFAULT_BASE_URL: &str = "https://esi.evetech.net/";

/// User agent sent when none has been configured. You should set your own.
pub const DEFAULT_USER_AGENT: &str = concat!("esi-core/", env!("CARGO_PKG_VERSION"));

/// Environment variable overriding the base URL in [`ClientConfig::from_env`].
pub const ENV_BASE_URL: &str = "ESI_BASE_URL";

/// Environment variable overriding the user agent in [`ClientConfig::from_env`].
pub const ENV_USER_AGENT: &str = "ESI_USER_AGENT";

/// Where requests go and how they identify themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// A configuration for `base_url` with the default user agent.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Ok(Self {
            base_url: normalize_base(Url::parse(base_url)?)?,
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
        })
    }

    /// Read `ESI_BASE_URL` and `ESI_USER_AGENT`, falling back to defaults.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let base = lookup(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(&base)?;
        if let Some(agent) = lookup(ENV_USER_AGENT) {
            config.user_agent = Some(agent);
        }
        Ok(config)
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Replace the base URL. A missing trailing slash is added so relative
    /// paths resolve below the full base path.
    pub fn set_base_url(&mut self, base_url: &str) -> Result<(), Error> {
        self.base_url = normalize_base(Url::parse(base_url)?)?;
        Ok(())
    }
}

fn normalize_base(mut url: Url) -> Result<Url, Error> {
    if url.cannot_be_a_base() {
        return Err(Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// A destination for log lines emitted by the client.
pub trait LogSink: Send + Sync {
    fn log(&self, message: &str);
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, message: &str) {
        self(message)
    }
}

/// Optional logging hooks. An unset hook logs through `tracing` at the
/// matching level instead.
#[derive(Clone, Default)]
pub struct Logging {
    /// Deprecation warnings from the server.
    pub warn: Option<Arc<dyn LogSink>>,
    /// One line per completed exchange.
    pub debug: Option<Arc<dyn LogSink>>,
}

impl Logging {
    pub(crate) fn log_warn(&self, message: fmt::Arguments<'_>) {
        match &self.warn {
            Some(sink) => sink.log(&message.to_string()),
            None => tracing::warn!("{message}"),
        }
    }

    pub(crate) fn log_debug(&self, message: fmt::Arguments<'_>) {
        match &self.debug {
            Some(sink) => sink.log(&message.to_string()),
            None => tracing::debug!("{message}"),
        }
    }
}

impl fmt::Debug for Logging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logging")
            .field("warn", &self.warn.is_some())
            .field("debug", &self.debug.is_some())
            .finish()
    }
}

/// A client for the ESI API over transport `T`.
///
/// The transport is shared, not owned: pass the same `Arc` to as many
/// clients as needed.
pub struct Client<T> {
    pub(crate) transport: Arc<T>,
    pub(crate) config: ClientConfig,
    pub(crate) logging: Logging,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) rate: RateState,
}

impl<T: HttpTransport> Client<T> {
    /// A client for the public ESI API with the default user agent.
    pub fn new(transport: Arc<T>) -> Result<Self, Error> {
        Self::builder(transport).build()
    }

    pub fn builder(transport: Arc<T>) -> ClientBuilder<T> {
        ClientBuilder::new(transport)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        self.config.base_url()
    }

    pub fn set_base_url(&mut self, base_url: &str) -> Result<(), Error> {
        self.config.set_base_url(base_url)
    }

    pub fn set_user_agent(&mut self, user_agent: Option<String>) {
        self.config.user_agent = user_agent;
    }

    pub fn logging_mut(&mut self) -> &mut Logging {
        &mut self.logging
    }

    /// The error rate limit reported by the most recent failed exchange.
    pub fn rate(&self) -> Rate {
        self.rate.snapshot()
    }

    /// Build a request for `path`, relative to the base URL. A body, if
    /// given, is encoded as JSON.
    pub fn new_request<B>(
        &self,
        method: impl AsRef<str>,
        path: &str,
        body: Option<&B>,
    ) -> Result<HttpRequest, Error>
    where
        B: Serialize + ?Sized,
    {
        build_request(
            self.config.base_url(),
            self.config.user_agent.as_deref(),
            method.as_ref(),
            path,
            body,
        )
    }

    pub fn fleets(&self) -> FleetsEndpoint<'_, T> {
        FleetsEndpoint::new(self)
    }

    pub fn characters(&self) -> CharactersEndpoint<'_, T> {
        CharactersEndpoint::new(self)
    }
}

impl<T> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("logging", &self.logging)
            .field("rate", &self.rate.snapshot())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Client`].
pub struct ClientBuilder<T> {
    transport: Arc<T>,
    config: Option<ClientConfig>,
    logging: Logging,
    clock: Arc<dyn Clock>,
}

impl<T: HttpTransport> ClientBuilder<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            config: None,
            logging: Logging::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn build(self) -> Result<Client<T>, Error> {
        let config = match self.config {
            Some(config) => config,
            None => ClientConfig::new(DEFAULT_BASE_URL)?,
        };
        Ok(Client {
            transport: self.transport,
            config,
            logging: self.logging,
            clock: self.clock,
            rate: RateState::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn default_config_targets_public_esi() {
        let config = ClientConfig::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(config.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.user_agent.as_deref(), Some(DEFAULT_USER_AGENT));
    }

    #[test]
    fn trailing_slash_is_added() {
        let config = ClientConfig::new("http://localhost:3000/esi").unwrap();
        assert_eq!(config.base_url().as_str(), "http://localhost:3000/esi/");
    }

    #[test]
    fn cannot_be_a_base_url_is_rejected() {
        let err = ClientConfig::new("mailto:someone@example.com").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn unparseable_base_is_rejected() {
        assert!(matches!(
            ClientConfig::new("not a url").unwrap_err(),
            Error::InvalidUrl(_)
        ));
    }

    #[test]
    fn lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            (ENV_BASE_URL, "http://127.0.0.1:9000/api"),
            (ENV_USER_AGENT, "tester/0.1"),
        ]
        .into_iter()
        .collect();
        let config = ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.base_url().as_str(), "http://127.0.0.1:9000/api/");
        assert_eq!(config.user_agent.as_deref(), Some("tester/0.1"));
    }

    #[test]
    fn empty_lookup_uses_defaults() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ClientConfig::new(DEFAULT_BASE_URL).unwrap());
    }

    #[test]
    fn custom_sink_receives_warnings() {
        let lines = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let captured = lines.clone();
        let logging = Logging {
            warn: Some(Arc::new(move |line: &str| captured.lock().push(line.to_string()))),
            debug: None,
        };
        logging.log_warn(format_args!("route {} is deprecated", "v1/x/"));
        assert_eq!(lines.lock().as_slice(), ["route v1/x/ is deprecated"]);
    }
}
