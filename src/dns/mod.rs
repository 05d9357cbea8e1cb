//! Domain resolution: MX, A and TXT presence plus SPF/DMARC markers.
//!
//! The public entry point is [`resolve_domain`], which validates the domain
//! syntax (failing fast, without touching the network) and then issues the
//! lookups concurrently. A lookup that errors is treated as "no records".

mod error;
mod resolver;
mod types;

pub use error::DomainError;
pub use resolver::{LookupDomain, system_resolver};
pub use types::{DomainRecord, MxRecord};

use trust_dns_resolver::error::ResolveError;

use crate::validator;
use resolver::{fqdn, is_no_records};

/// Resolve `domain` with the system resolver.
pub async fn resolve_domain(domain: &str) -> Result<DomainRecord, DomainError> {
    let ascii = normalize(domain)?;
    let resolver = system_resolver()?;
    Ok(lookup_records(&resolver, &ascii).await)
}

/// Same as [`resolve_domain`] with a caller-provided resolver.
pub async fn resolve_with<R>(resolver: &R, domain: &str) -> Result<DomainRecord, DomainError>
where
    R: LookupDomain,
{
    let ascii = normalize(domain)?;
    Ok(lookup_records(resolver, &ascii).await)
}

fn normalize(domain: &str) -> Result<String, DomainError> {
    validator::normalize_domain(domain)
        .map_err(|reasons| DomainError::invalid_format(domain.trim(), reasons))
}

async fn lookup_records<R>(resolver: &R, ascii_domain: &str) -> DomainRecord
where
    R: LookupDomain,
{
    tracing::debug!(domain = ascii_domain, "resolving MX/A/TXT");
    let dmarc_name = fqdn("_dmarc", ascii_domain);
    let (mx, a, txt, dmarc) = tokio::join!(
        resolver.lookup_mx(ascii_domain),
        resolver.lookup_a(ascii_domain),
        resolver.lookup_txt(ascii_domain),
        resolver.lookup_txt(&dmarc_name),
    );

    let mx_hosts = ordered_exchanges(records_or_empty("MX", ascii_domain, mx));
    let a_addresses = records_or_empty("A", ascii_domain, a);
    let txt_records = records_or_empty("TXT", ascii_domain, txt);
    let dmarc_records = records_or_empty("TXT", &dmarc_name, dmarc);

    DomainRecord::from_lookups(
        ascii_domain.to_string(),
        mx_hosts,
        a_addresses,
        txt_records,
        dmarc_records,
    )
}

fn records_or_empty<T>(kind: &str, name: &str, result: Result<Vec<T>, ResolveError>) -> Vec<T> {
    match result {
        Ok(records) => records,
        Err(err) if is_no_records(&err) => {
            tracing::debug!(name, kind, "no records");
            Vec::new()
        }
        Err(err) => {
            tracing::debug!(name, kind, error = %err, "lookup failed, treating as absent");
            Vec::new()
        }
    }
}

/// Sorts by preference (stable for ties), drops duplicates and null MX
/// entries (`.`), and keeps only the host names.
fn ordered_exchanges(mut records: Vec<MxRecord>) -> Vec<String> {
    records.sort_by_key(|record| record.preference);
    let mut hosts: Vec<String> = Vec::with_capacity(records.len());
    for record in records {
        if record.exchange.is_empty() || hosts.contains(&record.exchange) {
            continue;
        }
        hosts.push(record.exchange);
    }
    hosts
}
