//! The safe-fetch pipeline: Validate → Resolve → Guard → Fetch.
//!
//! Strictly sequential and fail-fast; each stage's failure short-circuits
//! the rest. Resolve and Guard exist to keep SSRF targets away from the
//! fetcher: a request reaches the fetcher only after every resolved
//! address passed the guard. The fetcher re-resolves at connect time, so a
//! DNS answer changing in between remains a known TOCTOU gap.

use std::sync::Arc;

use crate::error::PipelineError;
use crate::fetch;
use crate::guard;
use crate::policy::FetchPolicy;
use crate::resolve::HostResolver;
use crate::validate;

/// Entry point running one guarded fetch per inbound request. Holds only
/// the immutable policy and the resolver branches derived from it; all
/// per-request state lives inside `run`.
pub struct FetchPipeline {
    policy: Arc<FetchPolicy>,
    resolver: HostResolver,
}

impl FetchPipeline {
    pub fn new(policy: Arc<FetchPolicy>) -> Self {
        let resolver = HostResolver::new(&policy);
        Self { policy, resolver }
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// Runs the full pipeline for `raw_url`. Every per-request structure
    /// (resolved address set, partial body) is created here and dropped
    /// when this call returns or is cancelled.
    pub async fn run(&self, raw_url: &str) -> Result<String, PipelineError> {
        let url = validate::validate_http_url(raw_url)?;
        let addresses = self.resolver.resolve_host(&url).await?;
        guard::check_addresses(&addresses, &self.policy.forbidden_networks)?;
        tracing::debug!("guard passed for {url} ({} addresses)", addresses.len());
        fetch::fetch_http_body(&self.policy, url).await
    }
}
