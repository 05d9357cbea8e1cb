/// Converts `domain` to its lowercase ASCII (IDNA) form and checks the
/// `label(.label)+` shape, with an alphabetic top-level label of 2+ chars.
/// Every violation is pushed into `reasons`; the ASCII form is returned even
/// when some checks fail so callers can report it.
pub(crate) fn check_domain(domain: &str, reasons: &mut Vec<String>) -> String {
    let trimmed = domain.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        reasons.push("domain is empty".to_string());
        return String::new();
    }

    let ascii = match idna::domain_to_ascii(trimmed) {
        Ok(d) => d.to_ascii_lowercase(),
        Err(_) => {
            reasons.push("domain punycode conversion failed".to_string());
            return trimmed.to_ascii_lowercase();
        }
    };

    if ascii.is_empty() {
        reasons.push("domain empty after IDNA conversion".to_string());
        return ascii;
    }
    if ascii.len() > 253 {
        reasons.push(format!("domain length {} > 253", ascii.len()));
    }

    let labels: Vec<&str> = ascii.split('.').collect();
    if labels.len() < 2 {
        reasons.push("domain must contain at least one dot".to_string());
    }

    for label in &labels {
        if label.is_empty() {
            reasons.push("empty domain label".to_string());
            continue;
        }
        if label.len() > 63 {
            reasons.push(format!(
                "domain label '{}' length {} > 63",
                label,
                label.len()
            ));
        }
        if label.starts_with('-') || label.ends_with('-') {
            reasons.push(format!(
                "domain label '{}' cannot start/end with '-'",
                label
            ));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            reasons.push(format!("domain label '{}' has invalid chars", label));
        }
    }

    if labels.len() >= 2 {
        let tld = labels[labels.len() - 1];
        if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
            reasons.push(format!(
                "top-level label '{}' must be 2+ letters",
                tld
            ));
        }
    }

    ascii
}
