use thiserror::Error;
use trust_dns_resolver::error::ResolveError;

/// Errors surfaced by [`DnsLookup`](super::DnsLookup) implementations.
///
/// "Name exists but has no records of that type" is not an error: lookups
/// return an empty list in that case.
#[derive(Debug, Error)]
pub enum DnsError {
    #[error("resolver initialization failed: {reason}")]
    ResolverInit { reason: String },
    #[error("{name} does not exist (NXDOMAIN)")]
    NotFound { name: String },
    #[error("DNS lookup for {name} timed out")]
    Timeout { name: String },
    #[error("DNS lookup for {name} failed: {source}")]
    Lookup {
        name: String,
        #[source]
        source: ResolveError,
    },
}

impl DnsError {
    pub(crate) fn resolver_init(reason: impl std::fmt::Display) -> Self {
        Self::ResolverInit {
            reason: reason.to_string(),
        }
    }

    pub(crate) fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub(crate) fn timeout(name: impl Into<String>) -> Self {
        Self::Timeout { name: name.into() }
    }

    pub(crate) fn lookup(name: impl Into<String>, source: ResolveError) -> Self {
        Self::Lookup {
            name: name.into(),
            source,
        }
    }
}
