//! Failure taxonomy for the safe-fetch pipeline.
//!
//! Every expected, user-facing outcome is a `FetchError` kind with a stable
//! reason text. Anything outside the taxonomy is an internal error and must
//! stay opaque to callers.

use thiserror::Error;

/// Expected failure of one pipeline stage. Carried detail is for logs; the
/// API surfaces only `reason()`.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Scheme is not http/https, or the authority is unusable.
    #[error("invalid url")]
    InvalidUrl,
    /// No nameserver returned an address for the host.
    #[error("dns resolution failed")]
    DnsResolutionFailed,
    /// A resolved address falls inside a forbidden network range.
    #[error("forbidden target host")]
    ForbiddenIp,
    /// Final HTTP status was not 200.
    #[error("non-200 HTTP status_code ({status})")]
    NonSuccessStatus { status: u16 },
    /// Content classified binary while binary payloads are disallowed.
    #[error("non-textual response ({content_type})")]
    NonTextualResponse { content_type: String },
    /// Streamed body exceeded the configured cap.
    #[error("exceeded max payload size ({limit} bytes)")]
    PayloadTooLarge { limit: usize },
    /// Redirect chain exceeded the configured cap.
    #[error("too many HTTP redirects")]
    TooManyRedirects,
    /// Could not establish the connection.
    #[error("connection failed")]
    ConnectFailed,
    /// Timed out waiting for response data.
    #[error("read timed out")]
    ReadTimedOut,
}

impl FetchError {
    /// Stable reason text surfaced to API callers.
    pub fn reason(&self) -> &'static str {
        match self {
            FetchError::InvalidUrl => "invalid url",
            FetchError::DnsResolutionFailed => "dns resolution failed",
            FetchError::ForbiddenIp => "forbidden target host",
            FetchError::NonSuccessStatus { .. } => "non-200 HTTP status_code",
            FetchError::NonTextualResponse { .. } => "non-textual response",
            FetchError::PayloadTooLarge { .. } => "exceeded max payload size",
            FetchError::TooManyRedirects => "too many HTTP redirects",
            FetchError::ConnectFailed => "connection failed",
            FetchError::ReadTimedOut => "read timed out",
        }
    }
}

/// Outcome error of one pipeline run: an expected fetch failure, or an
/// unanticipated internal error. The API layer maps the former to a client
/// error with its reason and the latter to an opaque server error.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
