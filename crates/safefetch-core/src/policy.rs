//! Immutable runtime policy derived from the on-disk configuration.

use anyhow::{Context, Result};
use ipnet::IpNet;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::config::AppConfig;

const DNS_PORT: u16 = 53;

/// Validated fetch policy, built once at startup and shared read-only
/// across all requests. Per-request state never lives here.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    pub nameservers: Vec<SocketAddr>,
    pub dns_timeout: Duration,
    pub forbidden_networks: Vec<IpNet>,
    pub user_agent: String,
    pub max_redirects: usize,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub max_payload_bytes: usize,
    pub allow_binary_mime_types: bool,
}

impl FetchPolicy {
    /// Builds a policy from loaded config, validating every nameserver and
    /// CIDR entry. An invalid entry is a startup error, never a per-request
    /// outcome.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let mut nameservers = Vec::with_capacity(cfg.net.dns_nameservers.len());
        for entry in &cfg.net.dns_nameservers {
            nameservers.push(parse_nameserver(entry)?);
        }
        anyhow::ensure!(!nameservers.is_empty(), "at least one nameserver is required");

        let mut forbidden_networks = Vec::with_capacity(cfg.net.forbidden_networks.len());
        for entry in &cfg.net.forbidden_networks {
            let net: IpNet = entry
                .parse()
                .with_context(|| format!("invalid forbidden network {entry:?}"))?;
            forbidden_networks.push(net);
        }

        anyhow::ensure!(
            cfg.http.max_payload_size_bytes > 0,
            "max_payload_size_bytes must be positive"
        );

        Ok(Self {
            nameservers,
            dns_timeout: positive_duration(
                cfg.net.dns_resolution_timeout_seconds,
                "dns_resolution_timeout_seconds",
            )?,
            forbidden_networks,
            user_agent: cfg.http.ua_string.clone(),
            max_redirects: cfg.http.max_redirects,
            connect_timeout: positive_duration(
                cfg.http.timeout_connect_seconds,
                "timeout_connect_seconds",
            )?,
            read_timeout: positive_duration(cfg.http.timeout_read_seconds, "timeout_read_seconds")?,
            max_payload_bytes: cfg.http.max_payload_size_bytes,
            allow_binary_mime_types: cfg.http.allow_binary_mime_types,
        })
    }
}

/// Accepts `"1.1.1.1"` (port 53 implied) or explicit `"127.0.0.1:5353"`.
fn parse_nameserver(entry: &str) -> Result<SocketAddr> {
    if let Ok(addr) = entry.parse::<SocketAddr>() {
        return Ok(addr);
    }
    let ip: IpAddr = entry
        .parse()
        .with_context(|| format!("invalid nameserver address {entry:?}"))?;
    Ok(SocketAddr::new(ip, DNS_PORT))
}

fn positive_duration(seconds: f64, field: &str) -> Result<Duration> {
    anyhow::ensure!(
        seconds.is_finite() && seconds > 0.0,
        "{field} must be a positive number of seconds"
    );
    Ok(Duration::from_secs_f64(seconds))
}
