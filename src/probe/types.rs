use std::fmt;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

/// Why a probe ended the way it did. Serialized as the snake_case code.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeReason {
    ValidMailbox,
    InvalidMailbox,
    SmtpTimeout,
    SmtpConnectionError,
    SmtpGreetingError,
    SmtpHeloError,
    SmtpMailFromError,
    AmbiguousSmtpResponse,
    ConnectionClosedUnexpectedly,
}

impl ProbeReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidMailbox => "valid_mailbox",
            Self::InvalidMailbox => "invalid_mailbox",
            Self::SmtpTimeout => "smtp_timeout",
            Self::SmtpConnectionError => "smtp_connection_error",
            Self::SmtpGreetingError => "smtp_greeting_error",
            Self::SmtpHeloError => "smtp_helo_error",
            Self::SmtpMailFromError => "smtp_mail_from_error",
            Self::AmbiguousSmtpResponse => "ambiguous_smtp_response",
            Self::ConnectionClosedUnexpectedly => "connection_closed_unexpectedly",
        }
    }

    /// Only an accepted or rejected `RCPT TO` says anything about the mailbox;
    /// every other reason is about the server or the network.
    pub fn is_conclusive(&self) -> bool {
        matches!(self, Self::ValidMailbox | Self::InvalidMailbox)
    }
}

impl fmt::Display for ProbeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of one SMTP probe.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub valid: bool,
    pub reason: ProbeReason,
    pub message: String,
}

impl ProbeResult {
    pub(crate) fn valid(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            reason: ProbeReason::ValidMailbox,
            message: message.into(),
        }
    }

    pub(crate) fn failed(reason: ProbeReason, message: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason,
            message: message.into(),
        }
    }
}

/// Probe result plus the evidence gathered on the way.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub exchange: String,
    pub result: ProbeResult,
    pub transcript: Vec<String>,
}

/// A raw SMTP reply: the three-digit code and the (joined) text lines.
/// Lines without a numeric code are kept with `code == 0`.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpReply {
    pub code: u16,
    pub message: String,
}

impl SmtpReply {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn unparsable(line: impl Into<String>) -> Self {
        Self {
            code: 0,
            message: line.into(),
        }
    }
}

impl fmt::Display for SmtpReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} {}", self.code, self.message)
        }
    }
}
