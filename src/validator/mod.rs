//! Local syntax validation. No I/O happens here: an address that fails these
//! checks never reaches DNS or SMTP.

mod domain;
mod local;
mod types;

pub use types::{EmailAddress, EmailError, ValidationMode, ValidationReport};

use std::sync::LazyLock;

use regex::Regex;

use domain::check_domain;
use local::{check_local_length, is_local_relaxed, is_local_strict};

const MAX_ADDRESS_LEN: usize = 254;

// forme générale: quelque-chose@quelque-chose.tld (tld >= 2 caractères)
static ADDRESS_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("address shape pattern is valid")
});

pub fn validate_email(email: &str, mode: ValidationMode) -> ValidationReport {
    let (reasons, _) = run_checks(email, mode);
    ValidationReport {
        ok: reasons.is_empty(),
        reasons,
    }
}

impl EmailAddress {
    /// Validates `email` and decomposes it. Surrounding whitespace is
    /// ignored; the domain is lower-cased and converted to its ASCII form.
    pub fn parse(email: &str, mode: ValidationMode) -> Result<Self, EmailError> {
        let (reasons, parts) = run_checks(email, mode);
        match parts {
            Some((local_part, domain, ascii_domain)) if reasons.is_empty() => Ok(Self {
                local_part,
                domain,
                ascii_domain,
            }),
            _ => Err(EmailError::InvalidFormat { reasons }),
        }
    }
}

impl std::str::FromStr for EmailAddress {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, ValidationMode::Strict)
    }
}

type Parts = (String, String, String);

fn run_checks(email: &str, mode: ValidationMode) -> (Vec<String>, Option<Parts>) {
    let input = email.trim();
    let mut reasons = Vec::new();

    if input.len() > MAX_ADDRESS_LEN {
        reasons.push(format!("total length {} > {MAX_ADDRESS_LEN}", input.len()));
    }

    let Some((local, domain)) = input.rsplit_once('@') else {
        reasons.push("must contain exactly one '@'".to_string());
        return (reasons, None);
    };
    let quoted = local.len() >= 2 && local.starts_with('"') && local.ends_with('"');
    if local.contains('@') && !quoted {
        reasons.push("must contain exactly one '@'".to_string());
        return (reasons, None);
    }

    if mode == ValidationMode::Strict && !ADDRESS_SHAPE.is_match(input) {
        reasons.push("does not look like name@domain.tld".to_string());
    }

    check_local_length(local, &mut reasons);
    let ascii_domain = check_domain(domain, &mut reasons);

    let local_ok = match mode {
        ValidationMode::Strict => is_local_strict(local),
        ValidationMode::Relaxed => is_local_relaxed(local),
    };
    if !local_ok {
        reasons.push(match mode {
            ValidationMode::Strict => "invalid local part (strict rules)".into(),
            ValidationMode::Relaxed => "invalid local part (relaxed rules)".into(),
        });
    }

    let parts = ascii_domain
        .map(|ascii| (local.to_string(), domain.to_lowercase(), ascii));
    (reasons, parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_basic() {
        let r = validate_email("alice@example.com", ValidationMode::Strict);
        assert!(r.ok, "{:?}", r.reasons);
    }

    #[test]
    fn rejects_double_at() {
        let r = validate_email("a@@b.com", ValidationMode::Strict);
        assert!(!r.ok);
    }

    #[test]
    fn rejects_plain_word() {
        let err = EmailAddress::parse("not-an-email", ValidationMode::Strict)
            .expect_err("no '@' must fail");
        assert!(err.reasons().iter().any(|r| r.contains("'@'")));
    }

    #[test]
    fn rejects_missing_domain_separator() {
        assert!(EmailAddress::parse("user@localhost", ValidationMode::Strict).is_err());
    }

    #[test]
    fn parse_decomposes_and_normalizes() {
        let addr = EmailAddress::parse("  Alice@Exämple.COM ", ValidationMode::Strict)
            .expect("valid address");
        assert_eq!(addr.local_part(), "Alice");
        assert_eq!(addr.domain(), "exämple.com");
        assert!(addr.ascii_domain().starts_with("xn--"));
        assert_eq!(addr.to_string(), format!("Alice@{}", addr.ascii_domain()));
    }

    #[test]
    fn accepts_test_tld() {
        let addr: EmailAddress = "user@domain-with-no-mx.test".parse().expect("valid");
        assert_eq!(addr.ascii_domain(), "domain-with-no-mx.test");
    }

    #[test]
    fn relaxed_accepts_quoted_local() {
        let r = validate_email("\"john doe\"@example.com", ValidationMode::Relaxed);
        assert!(r.ok, "{:?}", r.reasons);
        let r = validate_email("\"john doe\"@example.com", ValidationMode::Strict);
        assert!(!r.ok);
    }

    proptest! {
        #[test]
        fn strings_without_at_never_parse(s in "[^@]{0,80}") {
            prop_assert!(EmailAddress::parse(&s, ValidationMode::Strict).is_err());
        }

        #[test]
        fn domains_without_dot_never_parse(local in "[a-z]{1,10}", host in "[a-z]{1,10}") {
            let candidate = format!("{local}@{host}");
            prop_assert!(EmailAddress::parse(&candidate, ValidationMode::Strict).is_err());
        }
    }
}
