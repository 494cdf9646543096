//! Guarded streaming HTTP retrieval.
//!
//! Builds a client per invocation, follows redirects up to the configured
//! cap, rejects non-textual payloads before the body is consumed, and
//! streams the body with an incremental size cap so a response with no (or
//! an understated) Content-Length cannot exhaust memory.

mod mime;

use anyhow::Context;
use futures_util::StreamExt;
use reqwest::redirect;
use url::Url;

use crate::error::{FetchError, PipelineError};
use crate::policy::FetchPolicy;

/// Issues the GET and returns the decoded body.
///
/// Expected failures map onto `FetchError` kinds; transport errors the
/// taxonomy does not anticipate surface as internal errors and stay opaque
/// to callers.
pub async fn fetch_http_body(policy: &FetchPolicy, url: Url) -> Result<String, PipelineError> {
    let client = reqwest::Client::builder()
        .user_agent(policy.user_agent.clone())
        .redirect(redirect::Policy::limited(policy.max_redirects))
        .connect_timeout(policy.connect_timeout)
        .read_timeout(policy.read_timeout)
        .build()
        .context("building HTTP client")?;

    let response = client.get(url).send().await.map_err(map_transport_error)?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(FetchError::NonSuccessStatus {
            status: status.as_u16(),
        }
        .into());
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(mime::UNKNOWN_CONTENT_TYPE)
        .to_string();
    if !policy.allow_binary_mime_types && mime::is_binary_mime_type(&content_type) {
        return Err(FetchError::NonTextualResponse { content_type }.into());
    }

    // Content-Length is not always present, and is never trusted: the cap
    // is enforced on the stream itself, chunk by chunk.
    let mut payload: Vec<u8> = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_transport_error)?;
        payload.extend_from_slice(&chunk);
        if payload.len() > policy.max_payload_bytes {
            return Err(FetchError::PayloadTooLarge {
                limit: policy.max_payload_bytes,
            }
            .into());
        }
    }

    Ok(String::from_utf8_lossy(&payload).into_owned())
}

/// Maps reqwest failures onto the taxonomy. Anything the taxonomy does not
/// name stays internal.
fn map_transport_error(err: reqwest::Error) -> PipelineError {
    if err.is_redirect() {
        FetchError::TooManyRedirects.into()
    } else if err.is_connect() {
        FetchError::ConnectFailed.into()
    } else if err.is_timeout() {
        FetchError::ReadTimedOut.into()
    } else {
        PipelineError::Internal(anyhow::Error::new(err).context("unexpected transport failure"))
    }
}
