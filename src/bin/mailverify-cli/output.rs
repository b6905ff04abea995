use anyhow::Result;
#[cfg(not(feature = "with-serde"))]
use anyhow::bail;

use crate::args::Format;
use mailverify_lib::{CheckOutcome, MxRecord, ValidationReport, Verification};

pub fn print_report(email: &str, report: &ValidationReport) {
    if report.ok {
        println!("[OK]    {email}");
    } else {
        println!("[INVALID] {email} :: {}", report.reasons.join("; "));
    }
}

pub fn print_mx(domain: &str, records: &[MxRecord]) {
    println!("{domain}:");
    for record in records {
        println!("  {:>5}  {}", record.preference, record.exchange);
    }
}

pub fn print_verification(verification: &Verification, format: Format) -> Result<()> {
    match format {
        Format::Human => {
            print_human(verification);
            Ok(())
        }
        Format::Json => print_json(verification),
    }
}

fn print_human(v: &Verification) {
    let tag = match v.status() {
        mailverify_lib::VerificationStatus::Valid => "[VALID]",
        mailverify_lib::VerificationStatus::Invalid => "[INVALID]",
        mailverify_lib::VerificationStatus::Risky => "[RISKY]",
    };
    println!("{tag} {} :: {} ({})", v.email, v.verdict.message, v.verdict.details);
    println!("        mx:    {}", check_line(&v.mx_check));
    println!("        smtp:  {}", check_line(&v.smtp_check));
    println!("        dnsbl: {}", check_line(&v.dnsbl_check));
    println!("        score: {} ({})", v.score.score, v.score.verdict);
    if !v.score.reasons.is_empty() {
        println!("               {}", v.score.reasons.join("; "));
    }
    if let Some(probe) = &v.probe {
        for line in &probe.transcript {
            println!("        | {line}");
        }
    }
}

fn check_line(check: &CheckOutcome) -> String {
    let mark = if check.valid { "ok" } else { "fail" };
    format!("{mark} - {}", check.message)
}

#[cfg(feature = "with-serde")]
fn print_json(v: &Verification) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(v)?);
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn print_json(_v: &Verification) -> Result<()> {
    bail!("--format json nécessite la feature 'with-serde'")
}
