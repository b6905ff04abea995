use std::time::Duration;

use tracing::debug;

use super::{MxError, MxRecord};
use crate::dns::{DnsLookup, NameServers, build_resolver};

pub const DEFAULT_DNS_TIMEOUT: Duration = Duration::from_secs(5);

/// Lookup MX records for `domain` using the system resolver.
///
/// See [`resolve_mx`] for the outcome conventions.
pub async fn check_mx(domain: &str) -> Result<Vec<MxRecord>, MxError> {
    let resolver = build_resolver(NameServers::System, DEFAULT_DNS_TIMEOUT)
        .map_err(|source| MxError::Lookup { source })?;
    resolve_mx(&resolver, domain, DEFAULT_DNS_TIMEOUT).await
}

/// Resolves the MX set of `domain`, sorted by ascending preference and
/// de-duplicated.
///
/// The domain is normalized via IDNA before querying DNS. A single attempt is
/// made, bounded by `timeout`. A domain whose only record is a Null MX is
/// reported as [`MxError::NoMxRecords`].
pub async fn resolve_mx<R>(
    resolver: &R,
    domain: &str,
    timeout: Duration,
) -> Result<Vec<MxRecord>, MxError>
where
    R: DnsLookup + ?Sized,
{
    let ascii = normalize_domain(domain)?;

    let mut records = match tokio::time::timeout(timeout, resolver.lookup_mx(&ascii)).await {
        Ok(Ok(records)) => records,
        Ok(Err(err)) => return Err(MxError::from_dns(&ascii, err)),
        Err(_) => return Err(MxError::Timeout { domain: ascii }),
    };

    records.retain(|record| !record.is_null());
    records.sort();
    records.dedup();

    debug!(domain = %ascii, count = records.len(), "MX lookup finished");

    if records.is_empty() {
        Err(MxError::NoMxRecords { domain: ascii })
    } else {
        Ok(records)
    }
}

pub(crate) fn normalize_domain(domain: &str) -> Result<String, MxError> {
    let trimmed = domain.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return Err(MxError::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(MxError::idna)
}
