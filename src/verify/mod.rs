//! The verification pipeline: syntax, MX, then SMTP probe and DNSBL
//! reputation side by side, collapsed into one verdict and one score.

mod lists;
mod options;
mod score;
mod types;

pub use lists::{is_disposable_domain, is_role_account};
pub use options::VerifyOptions;
pub use score::{Finding, score};
pub use types::{
    CheckOutcome, DeliverabilityVerdict, MSG_DELIVERABLE, MSG_DOMAIN_NOT_FOUND, MSG_INCONCLUSIVE,
    MSG_INVALID_DOMAIN, MSG_INVALID_FORMAT, MSG_MAILBOX_NOT_FOUND, MSG_SERVER_ERROR, ScoreReport,
    Verification, VerificationStatus, VerificationVerdict,
};

use std::sync::Arc;

use tracing::{debug, info};

use crate::dns::{DnsError, DnsLookup, build_resolver};
use crate::mx::{MxError, MxRecord, resolve_mx};
use crate::probe::{ProbeReason, probe_mailbox};
use crate::reputation::check_reputation;
use crate::validator::{EmailAddress, EmailError};

/// Runs verifications with one shared resolver and fixed options.
///
/// Cheap to share behind an `Arc`; nothing is mutated by [`Verifier::verify`].
#[derive(Clone)]
pub struct Verifier {
    resolver: Arc<dyn DnsLookup>,
    options: VerifyOptions,
}

impl Verifier {
    pub fn new(resolver: Arc<dyn DnsLookup>, options: VerifyOptions) -> Self {
        Self { resolver, options }
    }

    /// Builds the `trust-dns` resolver described by `options`.
    pub fn from_options(options: VerifyOptions) -> Result<Self, DnsError> {
        let resolver = build_resolver(options.name_servers, options.dns_timeout)?;
        Ok(Self::new(Arc::new(resolver), options))
    }

    pub fn options(&self) -> &VerifyOptions {
        &self.options
    }

    /// Parses `email` with the configured validation mode.
    pub fn parse(&self, email: &str) -> Result<EmailAddress, EmailError> {
        EmailAddress::parse(email, self.options.mode)
    }

    /// Verifies a raw address. Never fails: every problem is part of the
    /// returned [`Verification`]. Invalid syntax costs no network I/O.
    pub async fn verify(&self, email: &str) -> Verification {
        match self.parse(email) {
            Ok(address) => self.verify_address(&address).await,
            Err(err) => {
                debug!(email = %email.trim(), error = %err, "syntax check failed");
                invalid_syntax(email.trim())
            }
        }
    }

    pub async fn verify_address(&self, address: &EmailAddress) -> Verification {
        let email = address.to_string();
        let mut findings = lists::address_findings(address);

        let records = match resolve_mx(
            self.resolver.as_ref(),
            address.ascii_domain(),
            self.options.dns_timeout,
        )
        .await
        {
            Ok(records) => records,
            Err(err) => {
                info!(%email, error = %err, "MX resolution failed");
                return mx_failure(email, findings, &err);
            }
        };
        let Some(best) = records.first().cloned() else {
            let err = MxError::NoMxRecords {
                domain: address.ascii_domain().to_string(),
            };
            return mx_failure(email, findings, &err);
        };

        let (probe, reputation) = tokio::join!(
            probe_mailbox(&best.exchange, address, &self.options.probe),
            check_reputation(
                self.resolver.as_ref(),
                &best.exchange,
                &self.options.reputation
            ),
        );

        let verdict = match probe.result.reason {
            ProbeReason::ValidMailbox => VerificationVerdict::deliverable(),
            ProbeReason::InvalidMailbox => {
                findings.push(Finding::MailboxRejected);
                VerificationVerdict::mailbox_not_found()
            }
            other => {
                findings.push(Finding::Inconclusive(other));
                VerificationVerdict::inconclusive(other)
            }
        };
        if reputation.is_listed() {
            findings.push(Finding::Blacklisted);
        }

        let score = score::score(&findings);
        info!(
            %email,
            status = %verdict.status,
            score = score.score,
            exchange = %best.exchange,
            "verification finished"
        );

        Verification {
            email,
            verdict,
            score,
            mx_check: mx_outcome(&best, records.len()),
            smtp_check: CheckOutcome::new(probe.result.valid, probe.result.message.clone()),
            dnsbl_check: CheckOutcome::new(reputation.valid, reputation.message.clone()),
            mx_records: records,
            probe: Some(probe),
            reputation: Some(reputation),
        }
    }
}

fn invalid_syntax(email: &str) -> Verification {
    Verification {
        email: email.to_string(),
        verdict: VerificationVerdict::invalid_format(),
        score: score::score(&[Finding::InvalidSyntax]),
        mx_check: CheckOutcome::not_run("invalid email format"),
        smtp_check: CheckOutcome::not_run("invalid email format"),
        dnsbl_check: CheckOutcome::not_run("invalid email format"),
        mx_records: Vec::new(),
        probe: None,
        reputation: None,
    }
}

fn mx_failure(email: String, mut findings: Vec<Finding>, err: &MxError) -> Verification {
    let verdict = if err.is_no_mail_domain() {
        findings.push(Finding::NoMxRecords);
        VerificationVerdict::invalid_domain()
    } else {
        findings.push(Finding::DomainNotFound);
        VerificationVerdict::domain_not_found()
    };
    Verification {
        email,
        verdict,
        score: score::score(&findings),
        mx_check: CheckOutcome::new(false, err.to_string()),
        smtp_check: CheckOutcome::not_run("no mail exchange to probe"),
        dnsbl_check: CheckOutcome::not_run("no mail exchange to look up"),
        mx_records: Vec::new(),
        probe: None,
        reputation: None,
    }
}

fn mx_outcome(best: &MxRecord, count: usize) -> CheckOutcome {
    CheckOutcome::new(
        true,
        format!(
            "{count} MX record(s) found; best is {} (preference {})",
            best.exchange, best.preference
        ),
    )
}
