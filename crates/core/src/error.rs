//! Sourcing error model.

use thiserror::Error;

/// Result type used across the sourcing domain.
pub type SourcingResult<T> = Result<T, SourcingError>;

/// Sourcing-level error.
///
/// Keep this focused on deterministic, per-order failures (validation,
/// fatal input problems, collaborator exhaustion). Allocation shortfalls are
/// never errors; they are backorder state on the line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourcingError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The order carries no destination address; nothing can be ranked.
    #[error("order has no destination address")]
    MissingDestination,

    /// No line on the order has a usable product id and positive quantity.
    #[error("order has no sourceable lines")]
    NoUsableLines,

    /// A line's product id was absent from the item-data response.
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// A collaborator call failed after retry exhaustion.
    #[error("collaborator {service} failed: {message}")]
    Collaborator {
        service: &'static str,
        message: String,
    },
}

impl SourcingError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unknown_product(product: impl Into<String>) -> Self {
        Self::UnknownProduct(product.into())
    }

    pub fn collaborator(service: &'static str, message: impl Into<String>) -> Self {
        Self::Collaborator {
            service,
            message: message.into(),
        }
    }
}
