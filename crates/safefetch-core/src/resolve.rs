//! Hostname resolution with concurrent multi-nameserver fan-out.
//!
//! Literal IP authorities bypass DNS entirely. For hostnames, every
//! configured nameserver is asked for A records at the same time; the
//! result is the union of whatever the responding nameservers returned.
//! A branch that times out or errors contributes nothing for that
//! nameserver only and is never retried.

use futures_util::future::join_all;
use hickory_resolver::config::{NameServerConfig, Protocol, ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use std::collections::BTreeSet;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use url::Url;

use crate::error::FetchError;
use crate::policy::FetchPolicy;

/// Per-request host resolution against the policy's nameserver set.
pub struct HostResolver {
    branches: Vec<ResolverBranch>,
    dns_timeout: Duration,
}

struct ResolverBranch {
    nameserver: SocketAddr,
    resolver: TokioAsyncResolver,
}

impl HostResolver {
    pub fn new(policy: &FetchPolicy) -> Self {
        let branches = policy
            .nameservers
            .iter()
            .map(|&nameserver| ResolverBranch {
                nameserver,
                resolver: build_resolver(nameserver, policy.dns_timeout),
            })
            .collect();
        Self {
            branches,
            dns_timeout: policy.dns_timeout,
        }
    }

    /// Resolves the URL's authority to the union of A records returned by
    /// all responding nameservers. Fails only when the union is empty.
    ///
    /// The returned set is owned by the calling request and must not be
    /// cached or reused across requests.
    pub async fn resolve_host(&self, url: &Url) -> Result<BTreeSet<IpAddr>, FetchError> {
        let authority = authority_of(url);

        // Literal addresses pass through without any DNS traffic.
        if let Ok(ip) = authority.parse::<IpAddr>() {
            return Ok(BTreeSet::from([ip]));
        }

        let queries = self
            .branches
            .iter()
            .map(|branch| branch.query(&authority, self.dns_timeout));
        let addresses: BTreeSet<IpAddr> = join_all(queries).await.into_iter().flatten().collect();

        if addresses.is_empty() {
            return Err(FetchError::DnsResolutionFailed);
        }
        Ok(addresses)
    }
}

impl ResolverBranch {
    /// One independent timed A-record query. A timeout or lookup error
    /// yields an empty contribution for this nameserver only.
    async fn query(&self, host: &str, timeout: Duration) -> Vec<IpAddr> {
        match tokio::time::timeout(timeout, self.resolver.ipv4_lookup(host)).await {
            Ok(Ok(lookup)) => lookup.iter().map(|a| IpAddr::V4(a.0)).collect(),
            Ok(Err(err)) => {
                tracing::warn!(
                    "DNS lookup failed for NS {} and host {host}: {err}",
                    self.nameserver
                );
                Vec::new()
            }
            Err(_) => {
                tracing::warn!(
                    "DNS lookup timed out for NS {} and host {host}",
                    self.nameserver
                );
                Vec::new()
            }
        }
    }
}

/// The authority as the request named it: `host[:port]`. An authority with
/// an explicit port (or IPv6 brackets, which `host_str` keeps) does not
/// parse as a bare `IpAddr` and therefore takes the DNS path.
fn authority_of(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

fn build_resolver(nameserver: SocketAddr, timeout: Duration) -> TokioAsyncResolver {
    let mut config = ResolverConfig::new();
    config.add_name_server(NameServerConfig::new(nameserver, Protocol::Udp));

    let mut opts = ResolverOpts::default();
    opts.timeout = timeout;
    // A failed branch is reported as empty, never retried.
    opts.attempts = 1;
    // Every request must observe a fresh answer.
    opts.cache_size = 0;
    opts.use_hosts_file = false;

    TokioAsyncResolver::tokio(config, opts)
}
