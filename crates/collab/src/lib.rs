//! `shipsource-collab` — collaborator contracts and the per-order pipeline.
//!
//! The engine is pure and synchronous; everything that talks to the outside
//! world (item data, inventory, the location network, shipping rates, the
//! order store) lives here behind async traits, wrapped in bounded retry with
//! alerting, and is orchestrated by [`pipeline::source_order`].

pub mod alert;
pub mod config;
pub mod error;
pub mod memory;
pub mod pipeline;
pub mod retry;
pub mod services;

pub use alert::{Alerter, TracingAlerter};
pub use config::SourcingConfig;
pub use error::CollabError;
pub use pipeline::{source_order, Services};
pub use retry::{with_retry, BackoffStrategy, RetryPolicy};
pub use services::{
    InventoryService, ItemDataResponse, ItemDataService, LocationService, OrderStore,
    ShippingRateService,
};
