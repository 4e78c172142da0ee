//! Incoming sales order, as handed to a sourcing run.

use serde::{Deserialize, Serialize};

use shipsource_core::{Address, LocationId, OrderId};

/// One order line awaiting a ship-from assignment.
///
/// The product code is carried raw: lines with a blank code or a non-positive
/// quantity are excluded from allocation and flagged in the write-back, they
/// do not fail the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub line_no: u32,
    pub product: String,
    pub quantity: i64,
}

impl OrderLine {
    /// A line participates in allocation only with a usable product code and
    /// a positive quantity.
    pub fn is_usable(&self) -> bool {
        !self.product.trim().is_empty() && self.quantity > 0
    }
}

/// The order being sourced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesOrder {
    pub order_id: OrderId,
    /// The branch that took the order; fallback target for vendor-direct,
    /// no-source, and no-eligible-location lines.
    pub selling_warehouse: LocationId,
    pub destination: Address,
    /// Shipping price quoted to the customer, in the smallest currency unit
    /// (e.g. cents). Anchor for the freight cost threshold.
    pub shipping_price: u64,
    pub lines: Vec<OrderLine>,
}

impl SalesOrder {
    pub fn has_usable_lines(&self) -> bool {
        self.lines.iter().any(OrderLine::is_usable)
    }
}
