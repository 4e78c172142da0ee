//! Sourcing run configuration.

use std::time::Duration;

use crate::retry::RetryPolicy;

/// Tunables for one deployment of the sourcing pipeline.
#[derive(Debug, Clone)]
pub struct SourcingConfig {
    /// A guideline group's estimated freight is excessive when it exceeds
    /// this multiple of the shipping price quoted on the order.
    pub cost_threshold_multiplier: f64,
    pub item_data_retry: RetryPolicy,
    pub inventory_retry: RetryPolicy,
    pub location_retry: RetryPolicy,
    pub freight_retry: RetryPolicy,
}

impl Default for SourcingConfig {
    fn default() -> Self {
        let fetch = RetryPolicy::exponential(
            3,
            Duration::from_millis(50),
            Duration::from_secs(2),
        );
        Self {
            cost_threshold_multiplier: 4.0,
            item_data_retry: fetch.clone(),
            inventory_retry: fetch.clone(),
            location_retry: fetch,
            freight_retry: RetryPolicy::linear(2, Duration::from_millis(100)),
        }
    }
}

impl SourcingConfig {
    pub fn with_cost_threshold_multiplier(mut self, multiplier: f64) -> Self {
        self.cost_threshold_multiplier = multiplier;
        self
    }

    pub fn with_fetch_retry(mut self, policy: RetryPolicy) -> Self {
        self.item_data_retry = policy.clone();
        self.inventory_retry = policy.clone();
        self.location_retry = policy;
        self
    }

    pub fn with_freight_retry(mut self, policy: RetryPolicy) -> Self {
        self.freight_retry = policy;
        self
    }
}
