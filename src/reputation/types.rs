use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_DNSBL_ZONE: &str = "zen.spamhaus.org";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReputationOptions {
    /// When false the check is skipped entirely.
    pub enabled: bool,
    /// DNSBL zone queried as `<reversed-ip>.<zone>`.
    pub zone: String,
    /// Cap for each of the two lookups (exchange address, DNSBL query).
    pub timeout: Duration,
}

impl Default for ReputationOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            zone: DEFAULT_DNSBL_ZONE.to_string(),
            timeout: crate::mx::DEFAULT_DNS_TIMEOUT,
        }
    }
}

/// Binary reputation verdict for one mail exchange.
///
/// `valid == false` only when the DNSBL positively listed the address;
/// every lookup problem is reported as `valid == true`.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReputationResult {
    pub valid: bool,
    pub message: String,
    /// Exchange address that was checked, when it could be resolved.
    #[cfg_attr(
        feature = "with-serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub address: Option<IpAddr>,
    /// DNSBL return code (`127.0.0.x`) when listed.
    #[cfg_attr(
        feature = "with-serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub listed_code: Option<Ipv4Addr>,
}

impl ReputationResult {
    pub(crate) fn clean(address: IpAddr, zone: &str) -> Self {
        Self {
            valid: true,
            message: format!("{address} is not listed on {zone}"),
            address: Some(address),
            listed_code: None,
        }
    }

    pub(crate) fn listed(address: IpAddr, zone: &str, code: Ipv4Addr) -> Self {
        Self {
            valid: false,
            message: format!("{address} is listed on {zone} ({code})"),
            address: Some(address),
            listed_code: Some(code),
        }
    }

    /// Fail-open outcome.
    pub(crate) fn unverified(address: Option<IpAddr>, why: impl std::fmt::Display) -> Self {
        Self {
            valid: true,
            message: format!("reputation could not be verified: {why}"),
            address,
            listed_code: None,
        }
    }

    pub(crate) fn skipped() -> Self {
        Self {
            valid: true,
            message: "reputation check disabled".to_string(),
            address: None,
            listed_code: None,
        }
    }

    /// True when the DNSBL answered and listed the address.
    pub fn is_listed(&self) -> bool {
        self.listed_code.is_some()
    }
}
