//! Per-order inventory bookkeeping.

use std::collections::HashMap;

use shipsource_catalog::StockingStatus;
use shipsource_core::{LocationId, ProductId};

/// The two parallel capacity tables one sourcing run allocates against.
///
/// `available` is the true point-in-time snapshot; only the backorder
/// resolver's zero-out mutates it. `working` is the multi-line copy both
/// allocators decrement as lines consume capacity; it is reset to a fresh
/// copy of `available` whenever a different allocation strategy begins
/// processing a product. Quantities absent from a table read as zero.
#[derive(Debug, Clone, Default)]
pub struct InventoryLedger {
    available: HashMap<ProductId, HashMap<LocationId, i64>>,
    working: HashMap<ProductId, HashMap<LocationId, i64>>,
    stocking: HashMap<ProductId, HashMap<LocationId, StockingStatus>>,
}

impl InventoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from fetched availability and stocking tables. The
    /// working copy starts as a clone of `available`.
    pub fn from_tables(
        available: HashMap<ProductId, HashMap<LocationId, i64>>,
        stocking: HashMap<ProductId, HashMap<LocationId, StockingStatus>>,
    ) -> Self {
        let working = available.clone();
        Self {
            available,
            working,
            stocking,
        }
    }

    pub fn set_available(&mut self, product: &ProductId, location: &LocationId, qty: i64) {
        self.available
            .entry(product.clone())
            .or_default()
            .insert(location.clone(), qty);
        self.working
            .entry(product.clone())
            .or_default()
            .insert(location.clone(), qty);
    }

    pub fn set_stocking(
        &mut self,
        product: &ProductId,
        location: &LocationId,
        status: StockingStatus,
    ) {
        self.stocking
            .entry(product.clone())
            .or_default()
            .insert(location.clone(), status);
    }

    pub fn available(&self, product: &ProductId, location: &LocationId) -> i64 {
        self.available
            .get(product)
            .and_then(|m| m.get(location))
            .copied()
            .unwrap_or(0)
    }

    pub fn working(&self, product: &ProductId, location: &LocationId) -> i64 {
        self.working
            .get(product)
            .and_then(|m| m.get(location))
            .copied()
            .unwrap_or(0)
    }

    pub fn stocking(&self, product: &ProductId, location: &LocationId) -> StockingStatus {
        self.stocking
            .get(product)
            .and_then(|m| m.get(location))
            .copied()
            .unwrap_or(StockingStatus::Unknown)
    }

    /// Restore the working copy for one product to a fresh snapshot of
    /// `available`. Called whenever a new allocation strategy begins
    /// processing the product.
    pub fn reset_working(&mut self, product: &ProductId) {
        let fresh = self.available.get(product).cloned().unwrap_or_default();
        self.working.insert(product.clone(), fresh);
    }

    /// Decrement the working quantity at one location, flooring at zero.
    pub fn consume_working(&mut self, product: &ProductId, location: &LocationId, qty: i64) {
        let entry = self
            .working
            .entry(product.clone())
            .or_default()
            .entry(location.clone())
            .or_insert(0);
        *entry = (*entry - qty).max(0);
    }

    /// Mark a product/location pair fully spent after a single-line backorder
    /// commit; later stages that reconsult `available` see nothing left.
    pub fn zero_available(&mut self, product: &ProductId, location: &LocationId) {
        if let Some(m) = self.available.get_mut(product) {
            m.insert(location.clone(), 0);
        }
    }
}
