//! Candidate address synthesis from a person's name (or department
//! mailboxes when no name is known). Pure and deterministic.

use std::fmt;

#[derive(Debug, Clone, Copy)]
enum Piece {
    First,
    Last,
    FirstInitial,
    LastInitial,
    Lit(&'static str),
}

use Piece::{First, FirstInitial, Last, LastInitial, Lit};

/// Name-based local-part templates, in emission order.
const NAME_TEMPLATES: &[&[Piece]] = &[
    &[First, Lit("."), Last],
    &[First, Last],
    &[Last, Lit("."), First],
    &[First, Lit("_"), Last],
    &[First, Lit("-"), Last],
    &[FirstInitial, Lit("."), Last],
    &[FirstInitial, Last],
    &[Last, First],
    &[Last, Lit("_"), First],
    &[LastInitial, First],
    &[FirstInitial, LastInitial],
    &[FirstInitial, Lit("."), LastInitial],
    &[First],
    &[Last],
    &[First, Last, Lit("1")],
    &[First, Lit("."), Last, Lit("1")],
];

const DEPARTMENT_MAILBOXES: &[&str] = &[
    "info", "contact", "sales", "support", "admin", "hello", "team", "office",
];

/// A synthesised `local@domain` pair.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub local_part: String,
    pub domain: String,
}

impl Candidate {
    pub fn new(local_part: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            local_part: local_part.into(),
            domain: domain.into(),
        }
    }

    pub fn address(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local_part, self.domain)
    }
}

/// Insertion-ordered set of candidates; duplicates are collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    items: Vec<Candidate>,
}

impl CandidateSet {
    fn insert(&mut self, candidate: Candidate) -> bool {
        if self.items.contains(&candidate) {
            return false;
        }
        self.items.push(candidate);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.items.iter()
    }

    pub fn contains_address(&self, address: &str) -> bool {
        self.items.iter().any(|c| c.to_string() == address)
    }

    pub fn addresses(&self) -> Vec<String> {
        self.items.iter().map(Candidate::address).collect()
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Builds the candidate set for `first last @ domain`.
///
/// With both names present the name templates are emitted. Department
/// mailboxes are added when neither name is given or when `company` is set,
/// together with `company` and `company.team`.
pub fn generate(first: &str, last: &str, domain: &str, company: Option<&str>) -> CandidateSet {
    let first = compact_lower(first);
    let last = compact_lower(last);
    let domain = domain.trim().to_ascii_lowercase();
    let company = company.map(compact_lower).filter(|c| !c.is_empty());

    let mut set = CandidateSet::default();

    if !first.is_empty() && !last.is_empty() {
        for template in NAME_TEMPLATES {
            let local = render(template, &first, &last);
            set.insert(Candidate::new(local, domain.as_str()));
        }
    }

    if (first.is_empty() && last.is_empty()) || company.is_some() {
        for dept in DEPARTMENT_MAILBOXES {
            set.insert(Candidate::new(*dept, domain.as_str()));
        }
        if let Some(company) = company {
            set.insert(Candidate::new(company.as_str(), domain.as_str()));
            set.insert(Candidate::new(format!("{company}.team"), domain.as_str()));
        }
    }

    set
}

fn render(template: &[Piece], first: &str, last: &str) -> String {
    let mut out = String::new();
    for piece in template {
        match piece {
            Piece::First => out.push_str(first),
            Piece::Last => out.push_str(last),
            Piece::FirstInitial => out.extend(first.chars().next()),
            Piece::LastInitial => out.extend(last.chars().next()),
            Piece::Lit(text) => out.push_str(text),
        }
    }
    out
}

fn compact_lower(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
