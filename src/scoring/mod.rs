//! Confidence scoring.
//!
//! The score is a pure function of the other fields of a
//! [`VerificationResult`]: nothing else may set it.

use phf::phf_set;

use crate::finder::VerificationResult;

/// Local parts that name a function rather than a person.
static ROLE_ACCOUNTS: phf::Set<&'static str> = phf_set! {
    "admin",
    "administrator",
    "webmaster",
    "info",
    "contact",
    "support",
    "sales",
    "marketing",
    "help",
    "mail",
    "office",
    "hr",
    "hiring",
    "jobs",
    "team",
    "no-reply",
    "noreply",
};

const FORMAT_POINTS: i32 = 20;
const MX_POINTS: i32 = 20;
const SPF_POINTS: i32 = 10;
const DMARC_POINTS: i32 = 10;
const MAILBOX_POINTS: i32 = 40;
const ROLE_PENALTY: i32 = 10;
const CATCH_ALL_PENALTY: i32 = 10;

/// Below this, [`assess`] explains what is missing.
pub const SUGGESTION_THRESHOLD: u8 = 50;

/// Case-insensitive exact match against the role vocabulary.
pub fn is_role_based(local_part: &str) -> bool {
    ROLE_ACCOUNTS.contains(local_part.to_ascii_lowercase().as_str())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub score: u8,
    pub suggestion: Option<String>,
}

pub fn assess(result: &VerificationResult) -> Assessment {
    let domain = &result.domain;
    let mut score = 0;
    if result.format_valid {
        score += FORMAT_POINTS;
    }
    if domain.has_mx {
        score += MX_POINTS;
    }
    if domain.has_spf {
        score += SPF_POINTS;
    }
    if domain.has_dmarc {
        score += DMARC_POINTS;
    }
    if result.mailbox.exists == Some(true) {
        score += MAILBOX_POINTS;
    }
    if result.role_based {
        score -= ROLE_PENALTY;
    }
    if result.mailbox.catch_all == Some(true) {
        score -= CATCH_ALL_PENALTY;
    }
    let score = score.clamp(0, 100) as u8;

    let suggestion = (score < SUGGESTION_THRESHOLD)
        .then(|| {
            let mut fragments = Vec::new();
            if !domain.has_mx {
                fragments.push("Domain has no mail server");
            }
            if result.role_based {
                fragments.push("Consider using a personal email");
            }
            if !domain.has_spf {
                fragments.push("Domain lacks SPF record");
            }
            if !domain.has_dmarc {
                fragments.push("Domain lacks DMARC record");
            }
            fragments
        })
        .filter(|fragments| !fragments.is_empty())
        .map(|fragments| fragments.join(". "));

    Assessment { score, suggestion }
}
