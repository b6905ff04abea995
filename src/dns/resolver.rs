use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use async_trait::async_trait;
use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{ResolverConfig, ResolverOpts},
    error::{ResolveError, ResolveErrorKind},
    proto::op::ResponseCode,
    system_conf::read_system_conf,
};

use super::DnsError;
use crate::mx::MxRecord;

/// Upstream servers used by [`build_resolver`].
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameServers {
    /// `/etc/resolv.conf` (or the platform equivalent).
    #[default]
    System,
    Google,
    Cloudflare,
    Quad9,
}

/// Async DNS queries needed by the verification pipeline.
#[async_trait]
pub trait DnsLookup: Send + Sync {
    /// MX records of `domain`, unsorted. A name that exists without MX data
    /// yields an empty list; a name that does not exist yields
    /// [`DnsError::NotFound`].
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsError>;

    /// IPv4 addresses of `name`, same conventions as [`DnsLookup::lookup_mx`].
    async fn lookup_ipv4(&self, name: &str) -> Result<Vec<Ipv4Addr>, DnsError>;

    /// IPv6 (AAAA) addresses of `name`.
    async fn lookup_ipv6(&self, name: &str) -> Result<Vec<Ipv6Addr>, DnsError>;
}

/// Builds a tokio resolver that makes a single attempt per query and gives
/// up after `timeout`.
pub fn build_resolver(
    servers: NameServers,
    timeout: Duration,
) -> Result<TokioAsyncResolver, DnsError> {
    let (config, mut opts) = match servers {
        NameServers::System => read_system_conf().map_err(DnsError::resolver_init)?,
        NameServers::Google => (ResolverConfig::google(), ResolverOpts::default()),
        NameServers::Cloudflare => (ResolverConfig::cloudflare(), ResolverOpts::default()),
        NameServers::Quad9 => (ResolverConfig::quad9(), ResolverOpts::default()),
    };
    opts.timeout = timeout;
    opts.attempts = 1;
    Ok(TokioAsyncResolver::tokio(config, opts))
}

#[async_trait]
impl DnsLookup for TokioAsyncResolver {
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsError> {
        let name = fqdn(domain);
        match self.mx_lookup(name.as_str()).await {
            Ok(lookup) => Ok(lookup
                .iter()
                .map(|mx| {
                    MxRecord::new(mx.preference(), normalize_exchange(&mx.exchange().to_utf8()))
                })
                .collect()),
            Err(err) => empty_or_error(domain, err),
        }
    }

    async fn lookup_ipv4(&self, name: &str) -> Result<Vec<Ipv4Addr>, DnsError> {
        let query = fqdn(name);
        match self.lookup_ip(query.as_str()).await {
            Ok(lookup) => Ok(lookup
                .iter()
                .filter_map(|ip| match ip {
                    IpAddr::V4(v4) => Some(v4),
                    IpAddr::V6(_) => None,
                })
                .collect()),
            Err(err) => empty_or_error(name, err),
        }
    }

    async fn lookup_ipv6(&self, name: &str) -> Result<Vec<Ipv6Addr>, DnsError> {
        let query = fqdn(name);
        match self.ipv6_lookup(query.as_str()).await {
            Ok(lookup) => Ok(lookup.iter().map(|aaaa| aaaa.0).collect()),
            Err(err) => empty_or_error(name, err),
        }
    }
}

fn empty_or_error<T>(name: &str, err: ResolveError) -> Result<Vec<T>, DnsError> {
    if let ResolveErrorKind::NoRecordsFound { response_code, .. } = err.kind() {
        return if *response_code == ResponseCode::NXDomain {
            Err(DnsError::not_found(name))
        } else {
            Ok(Vec::new())
        };
    }
    if matches!(err.kind(), ResolveErrorKind::Timeout) {
        return Err(DnsError::timeout(name));
    }
    Err(DnsError::lookup(name, err))
}

/// Absolute query name, so the resolver's search list is never applied.
pub(crate) fn fqdn(name: &str) -> String {
    let trimmed = name.trim().trim_end_matches('.');
    format!("{trimmed}.")
}

pub(crate) fn normalize_exchange(exchange: &str) -> String {
    exchange.trim_end_matches('.').to_ascii_lowercase()
}
