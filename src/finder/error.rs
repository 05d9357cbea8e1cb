use thiserror::Error;

use crate::dns::DomainError;

/// Fatal failures of the orchestration layer. Probe and lookup uncertainty is
/// never reported here; it is carried in the returned data.
#[derive(Debug, Error)]
pub enum FinderError {
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl FinderError {
    /// `true` when the caller supplied bad input rather than the environment
    /// failing.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::Domain(DomainError::InvalidDomainFormat { .. }))
    }
}
