use std::fmt;

use thiserror::Error;

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    #[default]
    Strict,
    Relaxed,
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub ok: bool,
    pub reasons: Vec<String>,
}

/// A syntactically valid address, split into its local part and domain.
///
/// Only [`EmailAddress::parse`] builds one, so holding an `EmailAddress`
/// means the syntax checks already passed. `ascii_domain` is the IDNA form
/// used for every DNS query and SMTP command.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress {
    pub(crate) local_part: String,
    pub(crate) domain: String,
    pub(crate) ascii_domain: String,
}

impl EmailAddress {
    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    /// Domain as typed, lower-cased.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn ascii_domain(&self) -> &str {
        &self.ascii_domain
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local_part, self.ascii_domain)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("invalid email format: {}", reasons.join("; "))]
    InvalidFormat { reasons: Vec<String> },
}

impl EmailError {
    pub fn reasons(&self) -> &[String] {
        match self {
            Self::InvalidFormat { reasons } => reasons,
        }
    }
}
