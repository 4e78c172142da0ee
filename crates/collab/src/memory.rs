//! In-memory collaborator implementations for tests and development.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use shipsource_catalog::{ItemAttributes, StockingStatus};
use shipsource_core::{Address, LocationId, OrderId, ProductId};
use shipsource_network::Location;
use shipsource_orders::SourcingRecord;

use crate::error::CollabError;
use crate::services::{
    InventoryService, ItemDataResponse, ItemDataService, LocationService, OrderStore,
    ShippingRateService,
};

/// In-memory item master.
#[derive(Debug, Default)]
pub struct InMemoryItemData {
    items: RwLock<HashMap<ProductId, ItemAttributes>>,
    stocking: RwLock<HashMap<ProductId, HashMap<LocationId, StockingStatus>>>,
}

impl InMemoryItemData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, attrs: ItemAttributes) {
        if let Ok(mut items) = self.items.write() {
            items.insert(attrs.product_id.clone(), attrs);
        }
    }

    pub fn set_stocking(&self, product: &ProductId, location: &LocationId, status: StockingStatus) {
        if let Ok(mut stocking) = self.stocking.write() {
            stocking
                .entry(product.clone())
                .or_default()
                .insert(location.clone(), status);
        }
    }
}

#[async_trait]
impl ItemDataService for InMemoryItemData {
    async fn fetch_items(&self, products: &[ProductId]) -> Result<ItemDataResponse, CollabError> {
        let items = self
            .items
            .read()
            .map_err(|_| CollabError::permanent(anyhow::anyhow!("item table poisoned")))?;
        let stocking = self
            .stocking
            .read()
            .map_err(|_| CollabError::permanent(anyhow::anyhow!("stocking table poisoned")))?;

        let found: Vec<ItemAttributes> = products
            .iter()
            .filter_map(|p| items.get(p).cloned())
            .collect();
        let stocking = products
            .iter()
            .filter_map(|p| stocking.get(p).map(|m| (p.clone(), m.clone())))
            .collect();

        Ok(ItemDataResponse {
            items: found,
            stocking,
        })
    }
}

/// In-memory availability table.
#[derive(Debug, Default)]
pub struct InMemoryInventory {
    table: RwLock<HashMap<ProductId, HashMap<LocationId, i64>>>,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, product: &ProductId, location: &LocationId, qty: i64) {
        if let Ok(mut table) = self.table.write() {
            table
                .entry(product.clone())
                .or_default()
                .insert(location.clone(), qty);
        }
    }
}

#[async_trait]
impl InventoryService for InMemoryInventory {
    async fn fetch_availability(
        &self,
        products: &[ProductId],
    ) -> Result<HashMap<ProductId, HashMap<LocationId, i64>>, CollabError> {
        let table = self
            .table
            .read()
            .map_err(|_| CollabError::permanent(anyhow::anyhow!("availability table poisoned")))?;
        Ok(products
            .iter()
            .filter_map(|p| table.get(p).map(|m| (p.clone(), m.clone())))
            .collect())
    }
}

/// In-memory candidate network, returned for every destination.
#[derive(Debug, Default)]
pub struct InMemoryNetwork {
    locations: RwLock<Vec<Location>>,
}

impl InMemoryNetwork {
    pub fn new(locations: Vec<Location>) -> Self {
        Self {
            locations: RwLock::new(locations),
        }
    }
}

#[async_trait]
impl LocationService for InMemoryNetwork {
    async fn fetch_network(
        &self,
        _selling_warehouse: &LocationId,
        _destination: &Address,
    ) -> Result<Vec<Location>, CollabError> {
        self.locations
            .read()
            .map(|l| l.clone())
            .map_err(|_| CollabError::permanent(anyhow::anyhow!("location table poisoned")))
    }
}

/// Linear freight rating: a per-shipment base fee plus a per-pound rate.
#[derive(Debug, Clone, Copy)]
pub struct PerShipmentRates {
    /// Fixed fee per shipment, in the smallest currency unit.
    pub base_cents: u64,
    /// Cost per pound, in the smallest currency unit.
    pub cents_per_pound: u64,
}

impl PerShipmentRates {
    pub fn new(base_cents: u64, cents_per_pound: u64) -> Self {
        Self {
            base_cents,
            cents_per_pound,
        }
    }
}

#[async_trait]
impl ShippingRateService for PerShipmentRates {
    async fn estimate(
        &self,
        _origin: &Address,
        _destination: &Address,
        weight: f64,
    ) -> Result<u64, CollabError> {
        Ok(self.base_cents + (weight.max(0.0).ceil() as u64) * self.cents_per_pound)
    }
}

/// In-memory sourcing-record store: JSON documents upserted by order id.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    records: RwLock<HashMap<OrderId, serde_json::Value>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, order_id: &OrderId) -> Option<SourcingRecord> {
        let doc = self.records.read().ok()?.get(order_id).cloned()?;
        serde_json::from_value(doc).ok()
    }

    /// The raw persisted document, as a downstream consumer would read it.
    pub fn get_doc(&self, order_id: &OrderId) -> Option<serde_json::Value> {
        self.records.read().ok()?.get(order_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn upsert(&self, record: &SourcingRecord) -> Result<(), CollabError> {
        let doc = serde_json::to_value(record)
            .map_err(|e| CollabError::permanent(anyhow::Error::from(e)))?;
        let mut records = self
            .records
            .write()
            .map_err(|_| CollabError::permanent(anyhow::anyhow!("record store poisoned")))?;
        records.insert(record.order_id.clone(), doc);
        Ok(())
    }
}
