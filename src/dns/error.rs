use thiserror::Error;

/// Errors raised by domain resolution. Individual lookup failures are not
/// errors: they are reported as absent records.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid domain format '{domain}': {}", .reasons.join("; "))]
    InvalidDomainFormat { domain: String, reasons: Vec<String> },
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: trust_dns_resolver::error::ResolveError,
    },
}

impl DomainError {
    pub(crate) fn invalid_format(domain: impl Into<String>, reasons: Vec<String>) -> Self {
        Self::InvalidDomainFormat {
            domain: domain.into(),
            reasons,
        }
    }

    pub(crate) fn resolver_init(source: trust_dns_resolver::error::ResolveError) -> Self {
        Self::ResolverInit { source }
    }
}
