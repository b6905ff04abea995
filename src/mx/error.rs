use thiserror::Error;

use crate::dns::DnsError;

#[derive(Debug, Error)]
pub enum MxError {
    #[error("domain is empty")]
    EmptyDomain,
    #[error("domain IDNA conversion failed")]
    IdnaConversion {
        #[source]
        source: idna::Errors,
    },
    #[error("domain {domain} does not exist")]
    DomainNotFound { domain: String },
    #[error("domain {domain} has no MX records")]
    NoMxRecords { domain: String },
    #[error("MX lookup for {domain} timed out")]
    Timeout { domain: String },
    #[error("MX lookup failed: {source}")]
    Lookup {
        #[source]
        source: DnsError,
    },
}

impl MxError {
    pub(crate) fn idna(source: idna::Errors) -> Self {
        Self::IdnaConversion { source }
    }

    pub(crate) fn from_dns(domain: &str, source: DnsError) -> Self {
        match source {
            DnsError::NotFound { .. } => Self::DomainNotFound {
                domain: domain.to_string(),
            },
            DnsError::Timeout { .. } => Self::Timeout {
                domain: domain.to_string(),
            },
            other => Self::Lookup { source: other },
        }
    }

    /// `true` when the domain cannot receive mail at all, as opposed to the
    /// lookup failing.
    pub fn is_no_mail_domain(&self) -> bool {
        matches!(self, Self::NoMxRecords { .. })
    }
}
