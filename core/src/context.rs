//! Per-exchange cancellation and deadline.
//!
//! A `Context` is handed to every dispatch. The transport future is raced
//! against the cancellation token and the deadline; whichever fires first
//! drops the in-flight exchange.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default)]
pub struct Context {
    token: Option<CancellationToken>,
    deadline: Option<(Instant, Duration)>,
}

impl Context {
    /// A context that is never canceled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Abort the exchange when `token` is canceled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Abort the exchange once `timeout` has elapsed from now.
    ///
    /// An earlier deadline already on the context is kept.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        match self.deadline {
            Some((existing, _)) if existing <= deadline => {}
            _ => self.deadline = Some((deadline, timeout)),
        }
        self
    }

    pub fn is_canceled(&self) -> bool {
        self.token.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    pub(crate) async fn cancelled(&self) {
        match &self.token {
            Some(token) => token.cancelled().await,
            None => std::future::pending().await,
        }
    }

    /// Resolves with the configured timeout once the deadline passes.
    pub(crate) async fn expired(&self) -> Duration {
        match self.deadline {
            Some((deadline, timeout)) => {
                tokio::time::sleep_until(deadline).await;
                timeout
            }
            None => std::future::pending().await,
        }
    }
}
