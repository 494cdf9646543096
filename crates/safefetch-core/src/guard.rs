//! Resolved-address policy check.

use ipnet::IpNet;
use std::collections::BTreeSet;
use std::net::IpAddr;

use crate::error::FetchError;

/// Rejects the whole set if any address falls inside any forbidden range.
///
/// All-or-nothing on purpose: a host that resolves to even one internal
/// address is treated as an attempt to reach that internal address, so no
/// filtered subset is ever fetched.
pub fn check_addresses(
    addresses: &BTreeSet<IpAddr>,
    forbidden: &[IpNet],
) -> Result<(), FetchError> {
    for addr in addresses {
        if let Some(net) = forbidden.iter().find(|net| net.contains(addr)) {
            tracing::warn!("resolved address {addr} is inside forbidden range {net}");
            return Err(FetchError::ForbiddenIp);
        }
    }
    Ok(())
}
