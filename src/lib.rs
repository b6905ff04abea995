#![forbid(unsafe_code)]
//! mailverify_lib — email deliverability verification: syntax, MX, SMTP
//! probe and DNSBL reputation, behind a library API, an HTTP API and a CLI.

pub mod dns;
pub mod logging;
pub mod mx;
pub mod probe;
pub mod reputation;
pub mod validator;
pub mod verify;

#[cfg(feature = "server")]
pub mod server;

pub use dns::{DnsError, DnsLookup, NameServers, build_resolver};
pub use mx::{Error as MxError, MxRecord, check_mx, resolve_mx};
pub use probe::{ProbeOptions, ProbeReason, ProbeReport, ProbeResult, probe_mailbox};
pub use reputation::{ReputationOptions, ReputationResult, check_reputation};
pub use validator::{EmailAddress, EmailError, ValidationMode, ValidationReport, validate_email};
pub use verify::{
    CheckOutcome, DeliverabilityVerdict, ScoreReport, Verification, VerificationStatus,
    VerificationVerdict, Verifier, VerifyOptions,
};
