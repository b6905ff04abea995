use phf::phf_set;

use super::score::Finding;
use crate::validator::EmailAddress;

// domaines jetables connus (liste courte, non exhaustive)
static DISPOSABLE_DOMAINS: phf::Set<&'static str> = phf_set! {
    "10minutemail.com",
    "burnermail.io",
    "discard.email",
    "dispostable.com",
    "emailondeck.com",
    "fakeinbox.com",
    "getnada.com",
    "guerrillamail.com",
    "guerrillamail.net",
    "maildrop.cc",
    "mailinator.com",
    "mailnesia.com",
    "mintemail.com",
    "moakt.com",
    "mohmal.com",
    "sharklasers.com",
    "spamgourmet.com",
    "temp-mail.org",
    "tempail.com",
    "tempmail.com",
    "throwawaymail.com",
    "trashmail.com",
    "yopmail.com",
};

static ROLE_LOCAL_PARTS: phf::Set<&'static str> = phf_set! {
    "abuse",
    "admin",
    "administrator",
    "billing",
    "careers",
    "contact",
    "help",
    "hostmaster",
    "hr",
    "info",
    "jobs",
    "marketing",
    "newsletter",
    "no-reply",
    "noc",
    "noreply",
    "office",
    "postmaster",
    "root",
    "sales",
    "security",
    "support",
    "team",
    "webmaster",
};

/// Matches the domain itself or any parent domain (`x.mailinator.com`).
pub fn is_disposable_domain(domain: &str) -> bool {
    let domain = domain.trim_end_matches('.').to_ascii_lowercase();
    let mut rest = domain.as_str();
    loop {
        if DISPOSABLE_DOMAINS.contains(rest) {
            return true;
        }
        match rest.split_once('.') {
            Some((_, parent)) if parent.contains('.') => rest = parent,
            _ => return false,
        }
    }
}

/// `support+tickets` counts as `support`.
pub fn is_role_account(local_part: &str) -> bool {
    let base = local_part
        .split_once('+')
        .map_or(local_part, |(base, _)| base)
        .to_ascii_lowercase();
    ROLE_LOCAL_PARTS.contains(base.as_str())
}

/// Findings that follow from the address alone.
pub(crate) fn address_findings(address: &EmailAddress) -> Vec<Finding> {
    let mut findings = Vec::new();
    if is_disposable_domain(address.ascii_domain()) {
        findings.push(Finding::DisposableDomain);
    }
    if is_role_account(address.local_part()) {
        findings.push(Finding::RoleAccount);
    }
    findings
}
