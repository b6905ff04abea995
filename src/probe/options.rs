use std::time::Duration;

/// Configuration knobs for [`probe_mailbox`](super::probe_mailbox).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    pub port: u16,
    pub helo_domain: String,
    /// Envelope sender; `verify@<helo_domain>` when unset or blank.
    pub mail_from: Option<String>,
    /// Deadline for the whole probe, connect included.
    pub timeout_ms: u64,
    /// Budget for the best-effort `QUIT` after the verdict.
    pub quit_timeout_ms: u64,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            port: 25,
            helo_domain: "localhost".to_string(),
            mail_from: None,
            timeout_ms: 6_000,
            quit_timeout_ms: 1_000,
        }
    }
}

impl ProbeOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn quit_timeout(&self) -> Duration {
        Duration::from_millis(self.quit_timeout_ms)
    }

    pub fn helo_name(&self) -> &str {
        let trimmed = self.helo_domain.trim();
        if trimmed.is_empty() { "localhost" } else { trimmed }
    }

    pub fn envelope_sender(&self) -> String {
        self.mail_from
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("verify@{}", self.helo_name()))
    }
}
