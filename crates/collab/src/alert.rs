//! Alerting hook for exhausted collaborator calls.

use tracing::error;

/// Receives an alert when a collaborator call fails beyond retry.
///
/// Kept as a trait so deployments can fan out to paging/chat integrations;
/// the default implementation writes a structured ERROR event.
pub trait Alerter: Send + Sync {
    fn alert(&self, context: &str, message: &str);
}

/// Alerter backed by the tracing pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAlerter;

impl Alerter for TracingAlerter {
    fn alert(&self, context: &str, message: &str) {
        error!(target: "shipsource::alerts", context, message, "sourcing alert");
    }
}
