use std::future::Future;
use std::net::IpAddr;

use trust_dns_resolver::{
    TokioAsyncResolver,
    error::{ResolveError, ResolveErrorKind},
    lookup::{Ipv4Lookup, TxtLookup},
};

use super::{DomainError, MxRecord};

/// The three DNS queries the resolver needs. Implemented for the tokio
/// resolver; tests substitute stubs.
pub trait LookupDomain: Sync {
    fn lookup_mx(
        &self,
        domain: &str,
    ) -> impl Future<Output = Result<Vec<MxRecord>, ResolveError>> + Send;

    fn lookup_a(
        &self,
        domain: &str,
    ) -> impl Future<Output = Result<Vec<IpAddr>, ResolveError>> + Send;

    fn lookup_txt(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<String>, ResolveError>> + Send;
}

/// Builds a resolver from the host's `/etc/resolv.conf` (or platform
/// equivalent).
pub fn system_resolver() -> Result<TokioAsyncResolver, DomainError> {
    TokioAsyncResolver::tokio_from_system_conf().map_err(DomainError::resolver_init)
}

impl LookupDomain for TokioAsyncResolver {
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, ResolveError> {
        let lookup = self.mx_lookup(domain).await?;
        Ok(lookup
            .iter()
            .map(|mx| MxRecord::new(mx.preference(), normalize_exchange(mx.exchange().to_utf8())))
            .collect())
    }

    async fn lookup_a(&self, domain: &str) -> Result<Vec<IpAddr>, ResolveError> {
        let lookup = self.ipv4_lookup(domain).await?;
        Ok(collect_ipv4(&lookup))
    }

    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, ResolveError> {
        let lookup = self.txt_lookup(name).await?;
        Ok(collect_txt_records(&lookup))
    }
}

/// A records only; AAAA answers never count towards `has_a`.
pub(crate) fn collect_ipv4(lookup: &Ipv4Lookup) -> Vec<IpAddr> {
    lookup.iter().map(|a| IpAddr::V4(a.0)).collect()
}

fn collect_txt_records(lookup: &TxtLookup) -> Vec<String> {
    let mut records = Vec::new();
    for txt in lookup.iter() {
        let mut record = String::new();
        for piece in txt.txt_data().iter() {
            record.push_str(&String::from_utf8_lossy(piece));
        }
        records.push(record);
    }
    records
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    let trimmed = exchange.trim_end_matches('.');
    trimmed.to_ascii_lowercase()
}

pub(crate) fn fqdn(label: &str, domain: &str) -> String {
    let trimmed = label.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        domain.to_string()
    } else {
        format!("{}.{}", trimmed.to_ascii_lowercase(), domain)
    }
}

pub(crate) fn is_no_records(err: &ResolveError) -> bool {
    matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. })
}
