const MAX_LOCAL_LEN: usize = 64;

/// atext RFC 5322 (hors alphanumériques ASCII).
fn is_atext_symbol(c: char) -> bool {
    matches!(
        c,
        '!' | '#'
            | '$'
            | '%'
            | '&'
            | '\''
            | '*'
            | '+'
            | '-'
            | '/'
            | '='
            | '?'
            | '^'
            | '_'
            | '`'
            | '{'
            | '|'
            | '}'
            | '~'
    )
}

/// Règles strictes: dot-atom ASCII, '.' non initial/terminal, pas de "..".
pub(crate) fn is_local_strict(s: &str) -> bool {
    if s.is_empty() || s.starts_with('.') || s.ends_with('.') || s.contains("..") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || is_atext_symbol(c))
}

/// Règles relaxed: accepte une quoted-string sans CR/LF,
/// sinon retombe sur `is_local_strict`.
pub(crate) fn is_local_relaxed(s: &str) -> bool {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        let inner = &s[1..s.len() - 1];
        !inner.contains(['\r', '\n'])
    } else {
        is_local_strict(s)
    }
}

pub(crate) fn check_local_length(local: &str, reasons: &mut Vec<String>) {
    if local.is_empty() || local.len() > MAX_LOCAL_LEN {
        reasons.push(format!(
            "local part length {} invalid (1..={MAX_LOCAL_LEN})",
            local.len()
        ));
    }
}
