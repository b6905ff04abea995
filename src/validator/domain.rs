const MAX_LABEL_LEN: usize = 63;
const MAX_DOMAIN_LEN: usize = 253;

/// Valide le domaine: conversion IDNA + checks de labels.
/// Push des raisons invalidantes dans `reasons` et renvoie la forme ASCII
/// si la conversion a réussi.
pub(crate) fn check_domain(domain: &str, reasons: &mut Vec<String>) -> Option<String> {
    let domain_ascii = match idna::domain_to_ascii(domain) {
        Ok(d) => d,
        Err(_) => {
            reasons.push("domain punycode conversion failed".to_string());
            return None;
        }
    };

    if domain_ascii.is_empty() {
        reasons.push("domain empty after IDNA conversion".to_string());
        return None;
    }

    if domain_ascii.len() > MAX_DOMAIN_LEN {
        reasons.push(format!(
            "domain length {} > {MAX_DOMAIN_LEN}",
            domain_ascii.len()
        ));
    }

    if !domain_ascii.contains('.') {
        reasons.push("domain must contain at least one dot".to_string());
    }

    for label in domain_ascii.split('.') {
        if label.is_empty() {
            reasons.push("empty domain label".to_string());
            continue;
        }
        if label.len() > MAX_LABEL_LEN {
            reasons.push(format!(
                "domain label '{label}' length {} > {MAX_LABEL_LEN}",
                label.len()
            ));
        }
        if label.starts_with('-') || label.ends_with('-') {
            reasons.push(format!("domain label '{label}' cannot start/end with '-'"));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            reasons.push(format!("domain label '{label}' has invalid chars"));
        }
    }

    if let Some(tld) = domain_ascii.rsplit('.').next() {
        if !tld.is_empty() && tld.chars().all(|c| c.is_ascii_digit()) {
            reasons.push(format!("top-level label '{tld}' cannot be numeric"));
        }
    }

    Some(domain_ascii)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_domain_ok() {
        let mut reasons = vec![];
        let ascii = check_domain("example.com", &mut reasons);
        assert!(reasons.is_empty(), "{:?}", reasons);
        assert_eq!(ascii.as_deref(), Some("example.com"));
    }

    #[test]
    fn label_too_long() {
        let long = "a".repeat(64);
        let mut reasons = vec![];
        check_domain(&format!("{}.com", long), &mut reasons);
        assert!(!reasons.is_empty());
    }

    #[test]
    fn idn_domain_is_converted() {
        let mut reasons = vec![];
        let ascii = check_domain("exämple.com", &mut reasons).expect("ascii form");
        assert!(reasons.is_empty(), "{:?}", reasons);
        assert!(ascii.starts_with("xn--"));
    }

    #[test]
    fn numeric_tld_rejected() {
        let mut reasons = vec![];
        check_domain("10.0.0.1", &mut reasons);
        assert!(reasons.iter().any(|r| r.contains("numeric")));
    }
}
