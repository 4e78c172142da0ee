//! Collaborator contracts, specified at the interface boundary only.

use std::collections::HashMap;

use async_trait::async_trait;

use shipsource_catalog::{ItemAttributes, StockingStatus};
use shipsource_core::{Address, LocationId, ProductId};
use shipsource_network::Location;
use shipsource_orders::SourcingRecord;

use crate::error::CollabError;

/// Item attributes plus the stocking-status table for the requested products.
///
/// Products absent from `items` surface downstream as fatal
/// `UnknownProduct` errors during classification.
#[derive(Debug, Clone, Default)]
pub struct ItemDataResponse {
    pub items: Vec<ItemAttributes>,
    pub stocking: HashMap<ProductId, HashMap<LocationId, StockingStatus>>,
}

/// Fetches per-product attributes and stocking status.
#[async_trait]
pub trait ItemDataService: Send + Sync {
    async fn fetch_items(&self, products: &[ProductId]) -> Result<ItemDataResponse, CollabError>;
}

/// Fetches per-product, per-location available quantities. Missing
/// products/locations default to zero available.
#[async_trait]
pub trait InventoryService: Send + Sync {
    async fn fetch_availability(
        &self,
        products: &[ProductId],
    ) -> Result<HashMap<ProductId, HashMap<LocationId, i64>>, CollabError>;
}

/// Fetches the candidate location set for a selling warehouse and
/// destination, with the distance/transit metadata the rank sort needs.
#[async_trait]
pub trait LocationService: Send + Sync {
    async fn fetch_network(
        &self,
        selling_warehouse: &LocationId,
        destination: &Address,
    ) -> Result<Vec<Location>, CollabError>;
}

/// Estimates freight cost for one shipment, in the smallest currency unit.
/// Zero is a valid but suspicious result (logged by the caller, not fatal).
#[async_trait]
pub trait ShippingRateService: Send + Sync {
    async fn estimate(
        &self,
        origin: &Address,
        destination: &Address,
        weight: f64,
    ) -> Result<u64, CollabError>;
}

/// Persists sourcing records, upserted by order id, append-only per run.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn upsert(&self, record: &SourcingRecord) -> Result<(), CollabError>;
}
