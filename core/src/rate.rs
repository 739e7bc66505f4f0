//! Error-rate-limit bookkeeping.
//!
//! ESI throttles clients by the number of *failed* calls. Every failure
//! response carries the remaining budget and a reset delay in seconds; the
//! client keeps the last reported pair in a lock-guarded [`RateState`].

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use http::HeaderMap;
use parking_lot::Mutex;

/// Remaining error budget header.
pub const HEADER_ERROR_RATE_REMAINING: &str = "x-esi-error-limit-remain";

/// Seconds until the error budget resets.
pub const HEADER_ERROR_RATE_RESET: &str = "x-esi-error-limit-reset";

/// A snapshot of the server-reported error rate limit.
///
/// `reset` is `None` until a non-zero reset delay has been reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rate {
    pub remaining: i64,
    pub reset: Option<DateTime<Utc>>,
}

impl Rate {
    /// Parse the rate headers of a response received at `now`.
    ///
    /// Absent or non-numeric headers leave the field at its zero value.
    pub fn from_headers(headers: &HeaderMap, now: DateTime<Utc>) -> Self {
        let mut rate = Self::default();

        if let Some(remaining) = header_i64(headers, HEADER_ERROR_RATE_REMAINING) {
            rate.remaining = remaining;
        }

        if let Some(delay) = header_i64(headers, HEADER_ERROR_RATE_RESET).filter(|v| *v != 0) {
            rate.reset = TimeDelta::try_seconds(delay).and_then(|d| now.checked_add_signed(d));
        }

        rate
    }

    /// Time left until the reset instant, measured from `now`.
    ///
    /// Negative once the instant has passed; zero when no reset is known.
    pub fn reset_in(&self, now: DateTime<Utc>) -> TimeDelta {
        self.reset.map_or(TimeDelta::zero(), |reset| reset - now)
    }

    /// Render the string form against an explicit instant.
    pub fn render_at(&self, now: DateTime<Utc>) -> String {
        let secs = (self.reset_in(now).num_milliseconds() as f64 / 1000.0).round() as i64;
        format!(
            "error rate limit: {} remaining calls; reset in {secs}s",
            self.remaining
        )
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_at(Utc::now()))
    }
}

fn header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// The client's shared copy of the last reported [`Rate`].
///
/// Readers get a copy, so a partially written record is never observed.
#[derive(Debug, Default)]
pub(crate) struct RateState {
    inner: Mutex<Rate>,
}

impl RateState {
    pub(crate) fn snapshot(&self) -> Rate {
        *self.inner.lock()
    }

    pub(crate) fn record(&self, rate: Rate) {
        *self.inner.lock() = rate;
    }
}
