//! Shared commit routine.
//!
//! Both allocators and both backorder entry points assign ship-from through
//! here, so assignment semantics are identical regardless of strategy.

use shipsource_core::LocationId;

use crate::ledger::InventoryLedger;
use crate::line::Line;
use crate::snapshot::OrderSnapshot;

/// Commit a line to a location.
///
/// Records the ship-from, its display identifier, and the available quantity
/// observed at commit time. The working ledger is charged the requested
/// quantity when it covers the line; otherwise the remainder is consumed, the
/// shortfall is recorded, and the line is flagged backordered. Within a
/// strategy the working copy is the single source of truth for what is left,
/// so repeated products on one order cannot overdraw a location unnoticed.
pub fn commit_line(
    line: &mut Line,
    location: &LocationId,
    ledger: &mut InventoryLedger,
    snapshot: &OrderSnapshot,
) {
    let available = ledger.available(&line.product_id, location);
    let working = ledger.working(&line.product_id, location);

    line.ship_from = Some(location.clone());
    line.ship_from_name = snapshot.location_name(location);
    line.observed_qty = available;

    if working >= line.requested_qty {
        ledger.consume_working(&line.product_id, location, line.requested_qty);
        line.backordered_qty = 0;
        line.flags.backordered = false;
    } else {
        ledger.consume_working(&line.product_id, location, working);
        line.backordered_qty = (line.requested_qty - working.max(0)).max(0);
        line.flags.backordered = true;
    }
}

/// Commit a line that never consults the network (vendor-direct, no-source).
///
/// The selling warehouse is the ship-from of record; inventory is
/// informational only and no capacity is charged.
pub fn commit_bypass(
    line: &mut Line,
    location: &LocationId,
    ledger: &InventoryLedger,
    snapshot: &OrderSnapshot,
) {
    line.ship_from = Some(location.clone());
    line.ship_from_name = snapshot.location_name(location);
    line.observed_qty = ledger.available(&line.product_id, location);
    line.backordered_qty = 0;
    line.flags.backordered = false;
}
