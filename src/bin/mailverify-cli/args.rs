use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use mailverify_lib::ValidationMode;

#[derive(Parser)]
#[command(name = "mailverify-cli", version, about = "Email deliverability checks")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// more logs on stderr (-v debug, -vv trace); RUST_LOG wins
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// syntax check only, no network
    Validate {
        email: String,
        /// mode: strict|relaxed
        #[arg(long, default_value = "strict")]
        mode: String,
    },
    /// MX records of a domain, best first
    Mx {
        domain: String,
        /// DNS timeout (ms)
        #[arg(long = "timeout", default_value_t = 5_000)]
        timeout_ms: u64,
    },
    /// full pipeline: syntax, MX, SMTP probe, DNSBL
    Verify {
        email: String,
        /// format de sortie (human|json)
        #[arg(long, default_value = "human")]
        format: String,
        /// mode: strict|relaxed
        #[arg(long, default_value = "strict")]
        mode: String,
        /// nom utilisé pour HELO
        #[arg(long, env = "MAILVERIFY_HELO")]
        helo: Option<String>,
        /// enveloppe MAIL FROM (par défaut verify@<helo>)
        #[arg(long = "from", env = "MAILVERIFY_MAIL_FROM")]
        mail_from: Option<String>,
        /// port SMTP
        #[arg(long, default_value_t = 25)]
        port: u16,
        /// timeout global de la sonde SMTP (ms)
        #[arg(long = "timeout", default_value_t = 6_000)]
        timeout_ms: u64,
        /// zone DNSBL
        #[arg(long = "dnsbl-zone", env = "MAILVERIFY_DNSBL_ZONE")]
        dnsbl_zone: Option<String>,
        /// skip the DNSBL lookup
        #[arg(long = "no-reputation")]
        no_reputation: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn clap_command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }
}

pub fn parse_mode(s: &str) -> Result<ValidationMode> {
    match s {
        "strict" => Ok(ValidationMode::Strict),
        "relaxed" => Ok(ValidationMode::Relaxed),
        other => bail!("unknown --mode '{other}', use: strict|relaxed"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Human,
    Json,
}

pub fn parse_format(s: &str) -> Result<Format> {
    match s {
        "human" => Ok(Format::Human),
        "json" => Ok(Format::Json),
        other => bail!("unknown --format '{other}', use: human|json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_flags_parse() {
        let cli = Cli::try_parse_from([
            "mailverify-cli",
            "-vv",
            "verify",
            "user@example.com",
            "--format",
            "json",
            "--port",
            "2525",
            "--no-reputation",
        ])
        .expect("valid command line");
        assert_eq!(cli.verbose, 2);
        match cli.cmd {
            Some(Commands::Verify {
                email,
                format,
                port,
                no_reputation,
                ..
            }) => {
                assert_eq!(email, "user@example.com");
                assert_eq!(parse_format(&format).unwrap(), Format::Json);
                assert_eq!(port, 2525);
                assert!(no_reputation);
            }
            _ => panic!("expected verify subcommand"),
        }
    }

    #[test]
    fn mx_defaults_to_five_seconds() {
        let cli = Cli::try_parse_from(["mailverify-cli", "mx", "example.com"]).unwrap();
        assert!(matches!(cli.cmd, Some(Commands::Mx { timeout_ms: 5_000, .. })));
    }

    #[test]
    fn unknown_mode_and_format_are_rejected() {
        assert!(parse_mode("lenient").is_err());
        assert!(parse_format("csv").is_err());
        assert_eq!(parse_mode("relaxed").unwrap(), ValidationMode::Relaxed);
    }
}
