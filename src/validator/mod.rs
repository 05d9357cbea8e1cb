//! Address and domain syntax checks. Nothing here touches the network.

mod domain;

use std::sync::LazyLock;

use regex::Regex;

pub(crate) use domain::check_domain;

static ADDRESS_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("address format pattern is valid")
});

/// Returns `true` when `email` has the `local@domain.tld` shape accepted by
/// the verifier: ASCII letters, digits and `._+-` in the local part, a dotted
/// domain and an alphabetic TLD of at least two letters.
pub fn is_valid_format(email: &str) -> bool {
    ADDRESS_FORMAT.is_match(email.trim())
}

/// Splits an address into `(local, domain)` at its only `@`.
pub fn split_address(email: &str) -> Option<(&str, &str)> {
    let (local, domain) = email.trim().split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    Some((local, domain))
}

/// Normalises `domain` to lowercase ASCII and validates its syntax, returning
/// the list of violations on failure.
pub fn normalize_domain(domain: &str) -> Result<String, Vec<String>> {
    let mut reasons = Vec::new();
    let ascii = check_domain(domain, &mut reasons);
    if reasons.is_empty() {
        Ok(ascii)
    } else {
        Err(reasons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_basic() {
        assert!(is_valid_format("alice@example.com"));
        assert!(is_valid_format("first.last+tag@mail.example.co"));
        assert!(is_valid_format("  bob_o-k@example.org  "));
    }

    #[test]
    fn rejects_malformed() {
        assert!(!is_valid_format("invalid"));
        assert!(!is_valid_format("a@b"));
        assert!(!is_valid_format("a@b.c"));
        assert!(!is_valid_format("a b@example.com"));
        assert!(!is_valid_format("a@@example.com"));
        assert!(!is_valid_format("@example.com"));
        assert!(!is_valid_format("péché@example.com"));
    }

    #[test]
    fn split_address_at_single_at() {
        assert_eq!(
            split_address("jane@example.com"),
            Some(("jane", "example.com"))
        );
        assert_eq!(split_address("jane@"), None);
        assert_eq!(split_address("a@b@c.com"), None);
        assert_eq!(split_address("no-at-sign"), None);
    }

    #[test]
    fn normalize_domain_reports_reasons() {
        assert_eq!(normalize_domain("Example.Com").as_deref(), Ok("example.com"));
        let reasons = normalize_domain("nodot").expect_err("single label rejected");
        assert!(reasons.iter().any(|r| r.contains("dot")));
    }
}
