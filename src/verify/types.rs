use std::fmt;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

use crate::mx::MxRecord;
use crate::probe::{ProbeReason, ProbeReport};
use crate::reputation::ReputationResult;

pub const MSG_INVALID_FORMAT: &str = "Invalid Format";
pub const MSG_DOMAIN_NOT_FOUND: &str = "Domain Not Found";
pub const MSG_INVALID_DOMAIN: &str = "Invalid Domain";
pub const MSG_DELIVERABLE: &str = "Email is Deliverable";
pub const MSG_MAILBOX_NOT_FOUND: &str = "Mailbox Not Found";
pub const MSG_INCONCLUSIVE: &str = "Verification Inconclusive";
pub const MSG_SERVER_ERROR: &str = "Server Error";

#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationStatus {
    Valid,
    Invalid,
    Risky,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Risky => "risky",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `{status, message, details}` triple returned to callers.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationVerdict {
    pub status: VerificationStatus,
    pub message: String,
    pub details: String,
}

impl VerificationVerdict {
    fn new(status: VerificationStatus, message: &str, details: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
            details: details.to_string(),
        }
    }

    pub fn invalid_format() -> Self {
        Self::new(
            VerificationStatus::Invalid,
            MSG_INVALID_FORMAT,
            "Please enter a valid email address format.",
        )
    }

    pub fn domain_not_found() -> Self {
        Self::new(
            VerificationStatus::Invalid,
            MSG_DOMAIN_NOT_FOUND,
            "The domain could not be found in DNS.",
        )
    }

    pub fn invalid_domain() -> Self {
        Self::new(
            VerificationStatus::Invalid,
            MSG_INVALID_DOMAIN,
            "This domain does not have MX records and cannot receive mail.",
        )
    }

    pub fn deliverable() -> Self {
        Self::new(
            VerificationStatus::Valid,
            MSG_DELIVERABLE,
            "Mailbox confirmed to exist via SMTP check.",
        )
    }

    pub fn mailbox_not_found() -> Self {
        Self::new(
            VerificationStatus::Invalid,
            MSG_MAILBOX_NOT_FOUND,
            "The mail server reported that this specific email address does not exist.",
        )
    }

    pub fn inconclusive(reason: ProbeReason) -> Self {
        let details = match reason {
            ProbeReason::SmtpTimeout => {
                "The mail server did not answer in time, so the mailbox could not be confirmed."
            }
            ProbeReason::SmtpConnectionError => {
                "The mail server could not be reached to confirm the mailbox."
            }
            ProbeReason::SmtpGreetingError
            | ProbeReason::SmtpHeloError
            | ProbeReason::SmtpMailFromError => {
                "The mail server refused the verification handshake."
            }
            ProbeReason::ConnectionClosedUnexpectedly => {
                "The mail server closed the connection before confirming the mailbox."
            }
            ProbeReason::AmbiguousSmtpResponse
            | ProbeReason::ValidMailbox
            | ProbeReason::InvalidMailbox => {
                "The mail server gave an ambiguous answer for this address."
            }
        };
        Self::new(VerificationStatus::Risky, MSG_INCONCLUSIVE, details)
    }

    pub fn server_error() -> Self {
        Self::new(
            VerificationStatus::Invalid,
            MSG_SERVER_ERROR,
            "An unexpected error occurred while verifying this address.",
        )
    }
}

/// `{valid, message}` summary of one pipeline stage.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub valid: bool,
    pub message: String,
}

impl CheckOutcome {
    pub fn new(valid: bool, message: impl Into<String>) -> Self {
        Self {
            valid,
            message: message.into(),
        }
    }

    pub(crate) fn not_run(why: &str) -> Self {
        Self::new(false, format!("not checked: {why}"))
    }
}

#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliverabilityVerdict {
    Deliverable,
    Risky,
    Undeliverable,
}

impl DeliverabilityVerdict {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Self::Deliverable,
            50..=89 => Self::Risky,
            _ => Self::Undeliverable,
        }
    }
}

impl fmt::Display for DeliverabilityVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Deliverable => "Deliverable",
            Self::Risky => "Risky",
            Self::Undeliverable => "Undeliverable",
        };
        f.write_str(label)
    }
}

#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreReport {
    pub score: u8,
    pub verdict: DeliverabilityVerdict,
    pub reasons: Vec<String>,
}

/// Full record of one verification.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    /// Normalized address, or the trimmed input when it did not parse.
    pub email: String,
    pub verdict: VerificationVerdict,
    pub score: ScoreReport,
    pub mx_check: CheckOutcome,
    pub smtp_check: CheckOutcome,
    pub dnsbl_check: CheckOutcome,
    pub mx_records: Vec<MxRecord>,
    #[cfg_attr(
        feature = "with-serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub probe: Option<ProbeReport>,
    #[cfg_attr(
        feature = "with-serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub reputation: Option<ReputationResult>,
}

impl Verification {
    pub fn status(&self) -> VerificationStatus {
        self.verdict.status
    }
}
