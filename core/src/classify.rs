//! Success/failure classification of raw responses.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{ApiError, TransportError};
use crate::rate::Rate;
use crate::response::Response;
use crate::transport::HttpResponse;

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
}

/// Whether a status code counts as success.
pub fn is_success(status: u16) -> bool {
    (200..=299).contains(&status)
}

/// Outcome of reading a response body.
pub type Body = Result<Bytes, TransportError>;

/// Split a raw response into metadata and body on success, or build the
/// structured error on failure.
///
/// The error message is best-effort: a body that failed to read or is not
/// `{"error": "..."}` leaves it empty. A successful response hands its body
/// outcome through unchanged. `now` is the instant the response was
/// received and anchors the reset delay.
pub fn classify(
    response: HttpResponse,
    now: DateTime<Utc>,
) -> Result<(Response, Body), ApiError> {
    let HttpResponse {
        status,
        headers,
        body,
    } = response;

    if is_success(status.as_u16()) {
        return Ok((Response::new(status, headers), body));
    }

    let message = body
        .ok()
        .and_then(|body| serde_json::from_slice::<ErrorBody>(&body).ok())
        .map(|b| b.error)
        .unwrap_or_default();
    let rate = Rate::from_headers(&headers, now);

    Err(ApiError {
        status: status.as_u16(),
        message,
        rate,
        response: Response::new(status, headers),
    })
}
