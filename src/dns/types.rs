use std::net::IpAddr;

const SPF_MARKER: &str = "v=spf1";
const DMARC_MARKER: &str = "v=DMARC1";

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

impl MxRecord {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        Self {
            preference,
            exchange: exchange.into(),
        }
    }
}

/// DNS facts about a mail domain, built once per request.
///
/// `has_spf`/`has_dmarc` are derived from the TXT data with a case-sensitive
/// substring match; `valid` is `has_mx || has_a`.
#[cfg_attr(
    feature = "with-serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DomainRecord {
    pub domain: String,
    pub has_a: bool,
    #[cfg_attr(feature = "with-serde", serde(rename = "hasMX"))]
    pub has_mx: bool,
    /// Exchange hosts, lowest preference first.
    pub mx_hosts: Vec<String>,
    pub a_addresses: Vec<IpAddr>,
    pub txt_records: Vec<String>,
    /// TXT records published at `_dmarc.<domain>`.
    pub dmarc_records: Vec<String>,
    #[cfg_attr(feature = "with-serde", serde(rename = "hasSPF"))]
    pub has_spf: bool,
    #[cfg_attr(feature = "with-serde", serde(rename = "hasDMARC"))]
    pub has_dmarc: bool,
    pub valid: bool,
}

impl DomainRecord {
    pub(crate) fn from_lookups(
        domain: String,
        mx_hosts: Vec<String>,
        a_addresses: Vec<IpAddr>,
        txt_records: Vec<String>,
        dmarc_records: Vec<String>,
    ) -> Self {
        let has_mx = !mx_hosts.is_empty();
        let has_a = !a_addresses.is_empty();
        let has_spf = txt_records.iter().any(|r| r.contains(SPF_MARKER));
        let has_dmarc = txt_records
            .iter()
            .chain(dmarc_records.iter())
            .any(|r| r.contains(DMARC_MARKER));
        Self {
            domain,
            has_a,
            has_mx,
            mx_hosts,
            a_addresses,
            txt_records,
            dmarc_records,
            has_spf,
            has_dmarc,
            valid: has_mx || has_a,
        }
    }

    /// A record for a domain that was never looked up.
    pub fn unresolved(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }

    /// The most preferred exchange host, if any.
    pub fn primary_mx(&self) -> Option<&str> {
        self.mx_hosts.first().map(String::as_str)
    }
}
