use std::fmt;

/// Mask an email address: first character of the local part, then `***`,
/// then the full domain. Anything without an `@` is fully masked.
pub fn redact_email(input: &str) -> String {
    match input.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            format!("{first}***@{domain}")
        }
        None if input.is_empty() => String::new(),
        None => "***".to_string(),
    }
}

/// Short, non-reversible fingerprint of a bearer token for log correlation.
pub fn token_fingerprint(token: &str) -> String {
    let hash = blake3::hash(token.as_bytes());
    hash.to_hex()[..12].to_string()
}

/// Display wrapper that logs an email without exposing it.
pub struct Redacted<'a>(pub &'a str);

impl<'a> fmt::Display for Redacted<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact_email(self.0))
    }
}

impl<'a> fmt::Debug for Redacted<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact_email(self.0))
    }
}
