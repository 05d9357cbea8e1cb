use crate::dns::DomainRecord;
use crate::scoring;

/// Input of [`generate`](super::EmailFinder::generate).
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateRequest {
    pub first: String,
    pub last: String,
    pub domain: String,
    #[cfg_attr(feature = "with-serde", serde(default))]
    pub company: Option<String>,
}

impl GenerateRequest {
    pub fn new(first: impl Into<String>, last: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
            domain: domain.into(),
            company: None,
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }
}

/// Input of [`verify`](super::EmailFinder::verify). `deep` enables SMTP
/// probing; without it only format and DNS signals are scored.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyRequest {
    pub email: String,
    #[cfg_attr(feature = "with-serde", serde(default))]
    pub deep: bool,
}

impl VerifyRequest {
    pub fn new(email: impl Into<String>, deep: bool) -> Self {
        Self {
            email: email.into(),
            deep,
        }
    }
}

/// Candidates split by probe outcome. `other_patterns` holds everything not
/// positively accepted, including the whole set when no probe could run.
/// Serialised with snake_case keys, unlike [`VerificationResult`].
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub valid_emails: Vec<String>,
    pub other_patterns: Vec<String>,
    pub domain_info: DomainRecord,
}

impl GenerationReport {
    pub fn total(&self) -> usize {
        self.valid_emails.len() + self.other_patterns.len()
    }
}

/// Mailbox signals from SMTP probing; `None` means not probed or
/// undetermined.
#[cfg_attr(
    feature = "with-serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MailboxStatus {
    pub exists: Option<bool>,
    pub catch_all: Option<bool>,
}

#[cfg_attr(
    feature = "with-serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub email: String,
    pub format_valid: bool,
    pub role_based: bool,
    pub domain: DomainRecord,
    pub mailbox: MailboxStatus,
    /// Always the output of [`scoring::assess`] over the fields above.
    pub score: u8,
    pub suggestion: Option<String>,
    /// Human-readable notes, in the order they were produced.
    pub info: Vec<String>,
}

impl VerificationResult {
    pub(crate) fn new(email: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            format_valid: false,
            role_based: false,
            domain: DomainRecord::default(),
            mailbox: MailboxStatus::default(),
            score: 0,
            suggestion: None,
            info: Vec::new(),
        }
    }

    /// Recomputes `score` and `suggestion` from the other fields.
    pub fn rescore(&mut self) {
        let assessment = scoring::assess(self);
        self.score = assessment.score;
        self.suggestion = assessment.suggestion;
    }

    pub(crate) fn note(&mut self, message: impl Into<String>) {
        self.info.push(message.into());
    }
}
