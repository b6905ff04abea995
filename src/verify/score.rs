//! Deliverability score: a pure fold over the findings of one verification.

use std::fmt;

use super::types::{DeliverabilityVerdict, ScoreReport};
use crate::probe::ProbeReason;

const MAX_SCORE: i32 = 100;
const ROLE_ACCOUNT_PENALTY: i32 = 25;
const BLACKLIST_PENALTY: i32 = 20;
const INCONCLUSIVE_PENALTY: i32 = 30;

/// One observation that affects the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finding {
    InvalidSyntax,
    DomainNotFound,
    NoMxRecords,
    MailboxRejected,
    DisposableDomain,
    RoleAccount,
    Blacklisted,
    Inconclusive(ProbeReason),
}

enum Effect {
    /// Forces the score to zero.
    Critical,
    Penalty(i32),
}

impl Finding {
    fn effect(&self) -> Effect {
        match self {
            Self::InvalidSyntax
            | Self::DomainNotFound
            | Self::NoMxRecords
            | Self::MailboxRejected
            | Self::DisposableDomain => Effect::Critical,
            Self::RoleAccount => Effect::Penalty(ROLE_ACCOUNT_PENALTY),
            Self::Blacklisted => Effect::Penalty(BLACKLIST_PENALTY),
            Self::Inconclusive(_) => Effect::Penalty(INCONCLUSIVE_PENALTY),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSyntax => f.write_str("invalid email syntax"),
            Self::DomainNotFound => f.write_str("domain does not exist"),
            Self::NoMxRecords => f.write_str("domain has no MX records"),
            Self::MailboxRejected => f.write_str("mailbox rejected by the mail server"),
            Self::DisposableDomain => f.write_str("disposable email domain"),
            Self::RoleAccount => f.write_str("role-based account"),
            Self::Blacklisted => f.write_str("mail server is listed on a DNS blacklist"),
            Self::Inconclusive(reason) => write!(f, "SMTP check inconclusive ({reason})"),
        }
    }
}

pub fn score(findings: &[Finding]) -> ScoreReport {
    // None once a critical finding has been seen
    let raw = findings
        .iter()
        .fold(Some(MAX_SCORE), |score, finding| match (score, finding.effect()) {
            (Some(score), Effect::Penalty(points)) => Some(score - points),
            _ => None,
        });
    let score = raw.unwrap_or(0).clamp(0, MAX_SCORE);
    let score = u8::try_from(score).unwrap_or_default();

    ScoreReport {
        score,
        verdict: DeliverabilityVerdict::from_score(score),
        reasons: findings.iter().map(ToString::to_string).collect(),
    }
}
