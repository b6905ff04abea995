use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use mailverify_lib::{
    NameServers, VerificationStatus, Verifier, VerifyOptions, build_resolver, logging, resolve_mx,
    validate_email,
};

mod args;
mod output;

use args::{Cli, Commands, parse_format, parse_mode};

// 0 = ok, 2 = adresse invalide ou douteuse, 1 = erreur
const EXIT_OK: u8 = 0;
const EXIT_FATAL: u8 = 1;
const EXIT_REJECTED: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let Some(cmd) = cli.cmd else {
        let _ = Cli::clap_command().print_help();
        println!();
        return ExitCode::from(EXIT_OK);
    };

    match run(cmd) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(cmd: Commands) -> Result<u8> {
    match cmd {
        Commands::Validate { email, mode } => {
            let report = validate_email(&email, parse_mode(&mode)?);
            output::print_report(&email, &report);
            Ok(if report.ok { EXIT_OK } else { EXIT_REJECTED })
        }
        Commands::Mx { domain, timeout_ms } => {
            let timeout = Duration::from_millis(timeout_ms);
            let runtime = runtime()?;
            let result = runtime.block_on(async {
                let resolver = build_resolver(NameServers::System, timeout)
                    .context("build DNS resolver")?;
                anyhow::Ok(resolve_mx(&resolver, &domain, timeout).await)
            })?;
            match result {
                Ok(records) => {
                    output::print_mx(&domain, &records);
                    Ok(EXIT_OK)
                }
                Err(err) if err.is_no_mail_domain() => {
                    println!("{domain}: {err}");
                    Ok(EXIT_REJECTED)
                }
                Err(err) => Err(err).with_context(|| format!("MX lookup for {domain}")),
            }
        }
        Commands::Verify {
            email,
            format,
            mode,
            helo,
            mail_from,
            port,
            timeout_ms,
            dnsbl_zone,
            no_reputation,
        } => {
            let format = parse_format(&format)?;
            let mut options = VerifyOptions {
                mode: parse_mode(&mode)?,
                ..VerifyOptions::default()
            };
            if let Some(helo) = helo {
                options.probe.helo_domain = helo;
            }
            options.probe.mail_from = mail_from;
            options.probe.port = port;
            options.probe.timeout_ms = timeout_ms;
            if let Some(zone) = dnsbl_zone {
                options.reputation.zone = zone;
            }
            options.reputation.enabled = !no_reputation;

            let runtime = runtime()?;
            let verification = runtime.block_on(async {
                let verifier = Verifier::from_options(options).context("build DNS resolver")?;
                anyhow::Ok(verifier.verify(&email).await)
            })?;
            output::print_verification(&verification, format)?;
            Ok(match verification.status() {
                VerificationStatus::Valid => EXIT_OK,
                VerificationStatus::Invalid | VerificationStatus::Risky => EXIT_REJECTED,
            })
        }
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start tokio runtime")
}
