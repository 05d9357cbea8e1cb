//! Orchestration of the two user-facing flows.
//!
//! *Generation* resolves the domain once, synthesises candidates and, when an
//! exchange host exists, probes each candidate in turn. *Verification* checks
//! one address: format, role vocabulary, DNS, then (when `deep`) a mailbox
//! probe followed by a catch-all probe if the mailbox was accepted.
//!
//! Probing is sequential on purpose: a burst of parallel dialogues against one
//! exchange is the quickest way to get greylisted.

mod error;
mod types;

pub use error::FinderError;
pub use types::{GenerateRequest, GenerationReport, MailboxStatus, VerificationResult, VerifyRequest};

use trust_dns_resolver::TokioAsyncResolver;

use crate::dns::{self, DomainError, DomainRecord, LookupDomain};
use crate::patterns;
use crate::scoring;
use crate::smtp::{self, MailboxProber, ProbeOptions, SmtpProber};
use crate::validator;

/// DNS resolver and mailbox prober bundled for repeated use.
#[derive(Debug, Clone)]
pub struct EmailFinder<R, P> {
    resolver: R,
    prober: P,
}

impl EmailFinder<TokioAsyncResolver, SmtpProber> {
    /// System DNS configuration and a real SMTP prober.
    pub fn from_system_conf(options: ProbeOptions) -> Result<Self, FinderError> {
        let resolver = dns::system_resolver()?;
        Ok(Self::new(resolver, SmtpProber::new(options)))
    }
}

impl<R, P> EmailFinder<R, P>
where
    R: LookupDomain,
    P: MailboxProber,
{
    pub fn new(resolver: R, prober: P) -> Self {
        Self { resolver, prober }
    }

    /// Candidate addresses for a person at a domain, split by whether the
    /// primary exchange accepted them.
    ///
    /// Fails only for a syntactically invalid domain. A domain without MX
    /// records still yields every candidate, all unverified.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<GenerationReport, FinderError> {
        tracing::info!(domain = %request.domain, "generating candidates");
        let domain_info = dns::resolve_with(&self.resolver, &request.domain).await?;
        let candidates = patterns::generate(
            &request.first,
            &request.last,
            &domain_info.domain,
            request.company.as_deref(),
        );

        let mut valid_emails = Vec::new();
        let mut other_patterns = Vec::new();
        match domain_info.primary_mx() {
            Some(mx_host) => {
                for candidate in &candidates {
                    let address = candidate.address();
                    let outcome = self.prober.probe(&address, mx_host).await;
                    if outcome.is_accepted() {
                        valid_emails.push(address);
                    } else {
                        other_patterns.push(address);
                    }
                }
            }
            None => {
                tracing::info!(domain = %domain_info.domain, "no MX records, candidates left unverified");
                other_patterns = candidates.addresses();
            }
        }

        tracing::info!(
            domain = %domain_info.domain,
            accepted = valid_emails.len(),
            unverified = other_patterns.len(),
            "generation finished"
        );
        Ok(GenerationReport {
            valid_emails,
            other_patterns,
            domain_info,
        })
    }

    /// Scores one address. Every uncertainty ends up in the result, so this
    /// never fails.
    pub async fn verify(&self, request: &VerifyRequest) -> VerificationResult {
        let mut result = VerificationResult::new(&request.email);
        tracing::info!(email = %result.email, deep = request.deep, "verifying address");

        result.format_valid = validator::is_valid_format(&result.email);
        let parts = validator::split_address(&result.email)
            .map(|(local, domain)| (local.to_string(), domain.to_string()));
        let (local, domain) = match parts {
            Some(parts) if result.format_valid => parts,
            _ => {
                result.format_valid = false;
                result.note("Invalid email format");
                return finished(result);
            }
        };

        result.role_based = scoring::is_role_based(&local);
        if result.role_based {
            result.note("Role-based email detected");
        }

        result.domain = match dns::resolve_with(&self.resolver, &domain).await {
            Ok(record) => record,
            Err(err) => {
                tracing::debug!(domain = %domain, error = %err, "domain rejected");
                result.domain = DomainRecord::unresolved(domain.to_ascii_lowercase());
                result.note(match err {
                    DomainError::InvalidDomainFormat { .. } => "Invalid domain format".to_string(),
                    other => other.to_string(),
                });
                return finished(result);
            }
        };
        if !result.domain.valid {
            result.note("Invalid or non-existent domain");
            return finished(result);
        }

        if request.deep {
            self.probe_mailbox(&mut result).await;
        }
        finished(result)
    }

    async fn probe_mailbox(&self, result: &mut VerificationResult) {
        let Some(mx_host) = result.domain.primary_mx().map(str::to_string) else {
            result.note("No MX records; mailbox not probed");
            return;
        };

        let outcome = self.prober.probe(&result.email, &mx_host).await;
        result.mailbox.exists = outcome.accepted;
        result.note(outcome.reason_text);

        // a catch-all verdict only means something once the address itself
        // was accepted
        if result.mailbox.exists == Some(true) {
            let domain = result.domain.domain.clone();
            result.mailbox.catch_all = smtp::detect_catch_all(&self.prober, &domain, &mx_host).await;
            if result.mailbox.catch_all == Some(true) {
                result.note("Catch-all domain detected");
            }
        }
    }
}

fn finished(mut result: VerificationResult) -> VerificationResult {
    result.rescore();
    tracing::info!(email = %result.email, score = result.score, "verification finished");
    result
}

/// [`EmailFinder::generate`] with the system resolver.
pub async fn generate_emails(
    request: &GenerateRequest,
    options: ProbeOptions,
) -> Result<GenerationReport, FinderError> {
    // reject bad syntax before touching resolver configuration
    validator::normalize_domain(&request.domain)
        .map_err(|reasons| DomainError::invalid_format(request.domain.trim(), reasons))?;
    EmailFinder::from_system_conf(options)?.generate(request).await
}

/// [`EmailFinder::verify`] with the system resolver. Fails only when the
/// resolver cannot be configured.
pub async fn verify_email(
    request: &VerifyRequest,
    options: ProbeOptions,
) -> Result<VerificationResult, FinderError> {
    let finder = EmailFinder::from_system_conf(options)?;
    Ok(finder.verify(request).await)
}
