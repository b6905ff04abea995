use std::time::Duration;

use crate::dns::NameServers;
use crate::mx::DEFAULT_DNS_TIMEOUT;
use crate::probe::ProbeOptions;
use crate::reputation::ReputationOptions;
use crate::validator::ValidationMode;

/// Everything a [`Verifier`](super::Verifier) needs besides the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOptions {
    pub mode: ValidationMode,
    pub name_servers: NameServers,
    /// Cap for the MX lookup; also used by the resolver itself.
    pub dns_timeout: Duration,
    pub probe: ProbeOptions,
    pub reputation: ReputationOptions,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            mode: ValidationMode::Strict,
            name_servers: NameServers::System,
            dns_timeout: DEFAULT_DNS_TIMEOUT,
            probe: ProbeOptions::default(),
            reputation: ReputationOptions::default(),
        }
    }
}
