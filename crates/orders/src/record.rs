//! The per-run sourcing record written back through the order store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shipsource_catalog::SourcingGuideline;
use shipsource_core::{LocationId, OrderId, ProductId, SourcingRunId};

/// Write-back for one order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcedLine {
    pub line_no: u32,
    /// `None` when the incoming line carried no usable product code.
    pub product_id: Option<ProductId>,
    pub requested_qty: i64,
    pub guideline: Option<SourcingGuideline>,
    pub vendor: Option<String>,
    pub ship_from: Option<LocationId>,
    pub ship_from_name: Option<String>,
    /// Quantity observed available at the assigned location when the line
    /// was committed.
    pub observed_qty: i64,
    pub backordered_qty: i64,
    pub backordered: bool,
    pub multi_line: bool,
    pub no_eligible_location: bool,
    pub excluded: bool,
    pub message: String,
}

/// Write-back for one sourcing run over one order.
///
/// Append-only per run; the store upserts by order id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcingRecord {
    pub order_id: OrderId,
    pub run_id: SourcingRunId,
    pub sourced_at: DateTime<Utc>,
    /// Every included line has a ship-from and zero backorder.
    pub complete: bool,
    pub message: String,
    pub lines: Vec<SourcedLine>,
}

impl SourcingRecord {
    /// Lines that were allocated (not excluded) in this run.
    pub fn included_lines(&self) -> impl Iterator<Item = &SourcedLine> {
        self.lines.iter().filter(|l| !l.excluded)
    }

    /// Lines left short by this run.
    pub fn backordered_lines(&self) -> impl Iterator<Item = &SourcedLine> {
        self.lines.iter().filter(|l| l.backordered)
    }
}
