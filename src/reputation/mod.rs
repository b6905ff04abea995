//! DNSBL reputation of a mail exchange. Fail-open: only a positive listing
//! makes the result invalid.

mod types;

pub use types::{DEFAULT_DNSBL_ZONE, ReputationOptions, ReputationResult};

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use tracing::{debug, warn};

use crate::dns::{DnsError, DnsLookup, normalize_exchange};

/// Checks the first address of `exchange` against `options.zone`: IPv4 when
/// the exchange has one, IPv6 otherwise.
pub async fn check_reputation<R>(
    resolver: &R,
    exchange: &str,
    options: &ReputationOptions,
) -> ReputationResult
where
    R: DnsLookup + ?Sized,
{
    if !options.enabled {
        return ReputationResult::skipped();
    }
    let zone = options.zone.trim().trim_matches('.');
    if zone.is_empty() {
        return ReputationResult::unverified(None, "no DNSBL zone configured");
    }

    let exchange = normalize_exchange(exchange);
    let address = match exchange.parse::<IpAddr>() {
        Ok(literal) => literal,
        Err(_) => match exchange_address(resolver, &exchange, options.timeout).await {
            Ok(Some(address)) => address,
            Ok(None) => {
                debug!(%exchange, "exchange has no address");
                let why = format!("{exchange} has no IPv4 or IPv6 address");
                return ReputationResult::unverified(None, why);
            }
            Err(err) => {
                warn!(%exchange, error = %err, "could not resolve exchange for DNSBL check");
                return ReputationResult::unverified(None, err);
            }
        },
    };

    let query = dnsbl_query(address, zone);
    let answers = match tokio::time::timeout(options.timeout, resolver.lookup_ipv4(&query)).await {
        Ok(Ok(answers)) => answers,
        Ok(Err(DnsError::NotFound { .. })) => return ReputationResult::clean(address, zone),
        Ok(Err(err)) => {
            warn!(%query, error = %err, "DNSBL lookup failed");
            return ReputationResult::unverified(Some(address), err);
        }
        Err(_) => {
            warn!(%query, "DNSBL lookup timed out");
            return ReputationResult::unverified(Some(address), "DNSBL lookup timed out");
        }
    };

    let result = interpret(address, zone, &answers);
    debug!(%exchange, %address, valid = result.valid, "DNSBL lookup finished");
    result
}

/// First A record, or the first AAAA record when there is no A record.
async fn exchange_address<R>(
    resolver: &R,
    exchange: &str,
    limit: Duration,
) -> Result<Option<IpAddr>, DnsError>
where
    R: DnsLookup + ?Sized,
{
    let v4 = within(limit, exchange, resolver.lookup_ipv4(exchange)).await?;
    if let Some(address) = v4.first() {
        return Ok(Some(IpAddr::V4(*address)));
    }
    let v6 = within(limit, exchange, resolver.lookup_ipv6(exchange)).await?;
    Ok(v6.first().map(|address| IpAddr::V6(*address)))
}

async fn within<T>(
    limit: Duration,
    name: &str,
    lookup: impl Future<Output = Result<Vec<T>, DnsError>>,
) -> Result<Vec<T>, DnsError> {
    tokio::time::timeout(limit, lookup)
        .await
        .unwrap_or_else(|_| Err(DnsError::timeout(name)))
}

/// `1.2.3.4` + `zen.spamhaus.org` ⇒ `4.3.2.1.zen.spamhaus.org`. IPv6
/// addresses are reversed nibble by nibble, as in `ip6.arpa`.
pub(crate) fn dnsbl_query(address: IpAddr, zone: &str) -> String {
    match address {
        IpAddr::V4(v4) => {
            let [a, b, c, d] = v4.octets();
            format!("{d}.{c}.{b}.{a}.{zone}")
        }
        IpAddr::V6(v6) => {
            let mut query: String = v6
                .octets()
                .iter()
                .rev()
                .map(|byte| format!("{:x}.{:x}.", byte & 0x0f, byte >> 4))
                .collect();
            query.push_str(zone);
            query
        }
    }
}

fn interpret(address: IpAddr, zone: &str, answers: &[Ipv4Addr]) -> ReputationResult {
    // 127.255.255.0/24 signals refused or rate-limited queries, not a listing
    if let Some(code) = answers.iter().find(|ip| is_error_code(**ip)) {
        let why = format!("{zone} refused the query ({code})");
        return ReputationResult::unverified(Some(address), why);
    }
    match answers.iter().find(|ip| ip.is_loopback()) {
        Some(code) => ReputationResult::listed(address, zone, *code),
        None if answers.is_empty() => ReputationResult::clean(address, zone),
        None => ReputationResult::unverified(
            Some(address),
            format!("{zone} returned a non-DNSBL answer"),
        ),
    }
}

fn is_error_code(ip: Ipv4Addr) -> bool {
    let [a, b, c, _] = ip.octets();
    a == 127 && b == 255 && c == 255
}
