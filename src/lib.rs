#![forbid(unsafe_code)]
//! mailhunt_lib: discover and verify e-mail addresses without sending mail.
//!
//! Candidate addresses come from a person's name ([`patterns`]); each domain is
//! resolved once ([`dns`]); mailboxes are probed over SMTP up to `RCPT TO`
//! ([`smtp`]); and every signal folds into a 0–100 confidence score
//! ([`scoring`]). [`finder`] wires them together.

pub mod dns;
pub mod finder;
pub mod patterns;
pub mod scoring;
pub mod smtp;
pub mod validator;

pub use dns::{DomainError, DomainRecord, LookupDomain, MxRecord, resolve_domain};
pub use finder::{
    EmailFinder, FinderError, GenerateRequest, GenerationReport, MailboxStatus,
    VerificationResult, VerifyRequest, generate_emails, verify_email,
};
pub use patterns::{Candidate, CandidateSet};
pub use scoring::{Assessment, is_role_based};
pub use smtp::{MailboxProber, ProbeOptions, ProbeOutcome, ProbeStage, SmtpProber, probe_mailbox};
pub use validator::is_valid_format;
