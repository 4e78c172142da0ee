//! Backorder fallback: what happens when no candidate can cover a line.

use tracing::debug;

use shipsource_catalog::StockingStatus;
use shipsource_core::LocationId;

use crate::commit;
use crate::ledger::InventoryLedger;
use crate::line::Line;
use crate::snapshot::OrderSnapshot;

/// Closest-stocking fallback for a single line.
///
/// Target selection: lines already flagged `no_eligible_location` go straight
/// to the selling warehouse; otherwise the first eligible location actively
/// stocking the item wins, and failing that the first (closest-ranked)
/// eligible location regardless of stocking flag. The commit records the
/// shortfall, and the `available` entry at the chosen location is zeroed:
/// the quantity is fully spent from this order's point of view, even the part
/// that was short.
pub fn closest_stocking(line: &mut Line, ledger: &mut InventoryLedger, snapshot: &OrderSnapshot) {
    let target = pick_target(line, ledger, snapshot);

    debug!(
        line_no = line.line_no,
        product = %line.product_id,
        location = %target,
        "no location can cover the line; backordering at closest stocking location"
    );

    commit::commit_line(line, &target, ledger, snapshot);
    line.flags.stockout_fallback = true;
    ledger.zero_available(&line.product_id, &target);
}

/// Direct commit of one location to a list of lines (the complete-order
/// preferred-location fallback). Shortfalls become backorders; no further
/// location search happens and `available` is left untouched.
pub fn commit_direct(
    lines: &mut [Line],
    location: &LocationId,
    ledger: &mut InventoryLedger,
    snapshot: &OrderSnapshot,
) {
    for line in lines.iter_mut() {
        commit::commit_line(line, location, ledger, snapshot);
    }
}

fn pick_target(line: &Line, ledger: &InventoryLedger, snapshot: &OrderSnapshot) -> LocationId {
    if line.flags.no_eligible_location {
        return snapshot.selling_warehouse.clone();
    }
    if let Some(stocking) = line.eligible.iter().find(|loc| {
        ledger.stocking(&line.product_id, loc) == StockingStatus::Stocked
    }) {
        return stocking.clone();
    }
    line.eligible
        .first()
        .cloned()
        .unwrap_or_else(|| snapshot.selling_warehouse.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipsource_catalog::SourcingGuideline;
    use shipsource_core::ProductId;

    fn pid() -> ProductId {
        ProductId::new("A100").unwrap()
    }

    fn lid(s: &str) -> LocationId {
        LocationId::new(s).unwrap()
    }

    fn snapshot() -> OrderSnapshot {
        OrderSnapshot::new(Vec::new(), Vec::new(), lid("HQ"))
    }

    fn line(eligible: &[&str]) -> Line {
        let mut l = Line::new(1, pid(), 8, SourcingGuideline::BranchOnly);
        l.eligible = eligible.iter().map(|s| lid(s)).collect();
        l
    }

    #[test]
    fn prefers_first_actively_stocking_location() {
        let mut ledger = InventoryLedger::new();
        ledger.set_available(&pid(), &lid("BR01"), 2);
        ledger.set_available(&pid(), &lid("BR02"), 3);
        ledger.set_stocking(&pid(), &lid("BR02"), StockingStatus::Stocked);

        let mut l = line(&["BR01", "BR02"]);
        closest_stocking(&mut l, &mut ledger, &snapshot());

        assert_eq!(l.ship_from, Some(lid("BR02")));
        assert_eq!(l.backordered_qty, 5);
        assert!(l.flags.backordered);
        assert!(l.flags.stockout_fallback);
    }

    #[test]
    fn falls_back_to_closest_ranked_when_nothing_stocks() {
        let mut ledger = InventoryLedger::new();
        ledger.set_available(&pid(), &lid("BR01"), 1);

        let mut l = line(&["BR01", "BR02"]);
        closest_stocking(&mut l, &mut ledger, &snapshot());

        assert_eq!(l.ship_from, Some(lid("BR01")));
        assert_eq!(l.backordered_qty, 7);
    }

    #[test]
    fn no_eligible_location_targets_the_selling_warehouse() {
        let mut ledger = InventoryLedger::new();

        let mut l = line(&["BR01"]);
        l.flags.no_eligible_location = true;
        closest_stocking(&mut l, &mut ledger, &snapshot());

        assert_eq!(l.ship_from, Some(lid("HQ")));
        assert_eq!(l.backordered_qty, 8);
    }

    #[test]
    fn available_is_zeroed_after_the_commit() {
        let mut ledger = InventoryLedger::new();
        ledger.set_available(&pid(), &lid("BR01"), 3);

        let mut l = line(&["BR01"]);
        closest_stocking(&mut l, &mut ledger, &snapshot());

        assert_eq!(l.observed_qty, 3);
        assert_eq!(ledger.available(&pid(), &lid("BR01")), 0);
    }

    #[test]
    fn direct_commit_backorders_the_short_lines_only() {
        let mut ledger = InventoryLedger::new();
        ledger.set_available(&pid(), &lid("DC01"), 10);
        let other = ProductId::new("B200").unwrap();
        ledger.set_available(&other, &lid("DC01"), 1);

        let mut lines = vec![
            {
                let mut l = Line::new(1, pid(), 6, SourcingGuideline::FlexibleDc);
                l.eligible = vec![lid("DC01")];
                l
            },
            {
                let mut l = Line::new(2, other.clone(), 4, SourcingGuideline::FlexibleDc);
                l.eligible = vec![lid("DC01")];
                l
            },
        ];
        commit_direct(&mut lines, &lid("DC01"), &mut ledger, &snapshot());

        assert!(!lines[0].flags.backordered);
        assert!(lines[1].flags.backordered);
        assert_eq!(lines[1].backordered_qty, 3);
        // Direct commits never zero the snapshot.
        assert_eq!(ledger.available(&pid(), &lid("DC01")), 10);
    }
}
