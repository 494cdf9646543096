//! Syntactic admission control for requested URLs. No network access.

use url::Url;

use crate::error::FetchError;

/// Validates that `raw` is an http(s) URL with a usable authority.
///
/// The authority must keep at least one non-whitespace ASCII character;
/// this is checked against the raw string because `Url::parse` punycodes
/// non-ASCII hosts, which would otherwise admit authorities written
/// entirely in non-ASCII characters.
pub fn validate_http_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw).map_err(|_| FetchError::InvalidUrl)?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(FetchError::InvalidUrl);
    }
    match raw_authority(raw) {
        Some(authority) if authority.chars().any(|c| c.is_ascii() && !c.is_whitespace()) => Ok(url),
        _ => Err(FetchError::InvalidUrl),
    }
}

/// The authority substring as written: after the first `//`, up to the
/// first `/`, `?` or `#`.
fn raw_authority(raw: &str) -> Option<&str> {
    let (_, rest) = raw.split_once("//")?;
    rest.split(['/', '?', '#']).next()
}
