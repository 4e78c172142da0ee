//! Collaborator-boundary errors.

use thiserror::Error;

/// A failed collaborator call.
///
/// Transient failures (network, timeouts, 5xx-style conditions) are retried
/// by the decorator in [`crate::retry`]; permanent failures surface
/// immediately. Either way, exhaustion converts to
/// [`shipsource_core::SourcingError::Collaborator`] for the affected order
/// only.
#[derive(Debug, Error)]
pub enum CollabError {
    #[error("transient failure: {0}")]
    Transient(anyhow::Error),

    #[error("permanent failure: {0}")]
    Permanent(anyhow::Error),
}

impl CollabError {
    pub fn transient(err: impl Into<anyhow::Error>) -> Self {
        Self::Transient(err.into())
    }

    pub fn permanent(err: impl Into<anyhow::Error>) -> Self {
        Self::Permanent(err.into())
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
