//! Server configuration: an optional TOML file, then environment overrides.
//!
//! ```toml
//! [server]
//! listen = "0.0.0.0:3001"
//! request_timeout_secs = 30
//!
//! [dns]
//! servers = "system"      # system | google | cloudflare | quad9
//! timeout_ms = 5000
//!
//! [smtp]
//! helo_domain = "verifier.example.com"
//! mail_from = "probe@verifier.example.com"
//! timeout_ms = 6000
//!
//! [reputation]
//! enabled = true
//! zone = "zen.spamhaus.org"
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::dns::NameServers;
use crate::validator::ValidationMode;
use crate::verify::VerifyOptions;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:3001";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid listen address {value:?}: {source}")]
    Listen {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid port {value:?}: {source}")]
    Port {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// On-disk shape. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub dns: DnsSection,
    #[serde(default)]
    pub smtp: SmtpSection,
    #[serde(default)]
    pub reputation: ReputationSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub listen: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub validation_mode: Option<ValidationMode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DnsSection {
    pub servers: Option<NameServers>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmtpSection {
    pub helo_domain: Option<String>,
    pub mail_from: Option<String>,
    pub port: Option<u16>,
    pub timeout_ms: Option<u64>,
    pub quit_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReputationSection {
    pub enabled: Option<bool>,
    pub zone: Option<String>,
}

impl ConfigFile {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

/// Fully resolved settings of the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub request_timeout: Duration,
    pub verify: VerifyOptions,
}

impl ServerConfig {
    /// Reads `path` (when given) and applies the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => ConfigFile::from_path(path)?,
            None => ConfigFile::default(),
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merges `file` with the overrides returned by `env`:
    /// `MAILVERIFY_LISTEN`, `PORT`, `MAILVERIFY_HELO`, `MAILVERIFY_MAIL_FROM`
    /// and `MAILVERIFY_DNSBL_ZONE`. `PORT` replaces only the port of the
    /// listen address.
    pub fn resolve<F>(file: ConfigFile, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let listen_raw = lookup("MAILVERIFY_LISTEN")
            .or(file.server.listen)
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let mut listen: SocketAddr =
            listen_raw.trim().parse().map_err(|source| ConfigError::Listen {
                value: listen_raw.clone(),
                source,
            })?;
        if let Some(port) = lookup("PORT") {
            let parsed = port.trim().parse::<u16>().map_err(|source| ConfigError::Port {
                value: port.clone(),
                source,
            })?;
            listen.set_port(parsed);
        }

        let mut verify = VerifyOptions::default();
        if let Some(mode) = file.server.validation_mode {
            verify.mode = mode;
        }
        if let Some(servers) = file.dns.servers {
            verify.name_servers = servers;
        }
        if let Some(ms) = file.dns.timeout_ms {
            verify.dns_timeout = Duration::from_millis(ms);
        }
        verify.reputation.timeout = verify.dns_timeout;

        let smtp = file.smtp;
        if let Some(helo) = lookup("MAILVERIFY_HELO").or(smtp.helo_domain) {
            verify.probe.helo_domain = helo;
        }
        verify.probe.mail_from = lookup("MAILVERIFY_MAIL_FROM").or(smtp.mail_from);
        if let Some(port) = smtp.port {
            verify.probe.port = port;
        }
        if let Some(ms) = smtp.timeout_ms {
            verify.probe.timeout_ms = ms;
        }
        if let Some(ms) = smtp.quit_timeout_ms {
            verify.probe.quit_timeout_ms = ms;
        }

        if let Some(enabled) = file.reputation.enabled {
            verify.reputation.enabled = enabled;
        }
        if let Some(zone) = lookup("MAILVERIFY_DNSBL_ZONE").or(file.reputation.zone) {
            verify.reputation.zone = zone;
        }

        Ok(Self {
            listen,
            request_timeout: file
                .server
                .request_timeout_secs
                .map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs),
            verify,
        })
    }
}
