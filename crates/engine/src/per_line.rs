//! Per-line allocation: each line independently, first fit in rank order.

use std::collections::BTreeSet;

use tracing::debug;

use shipsource_core::{LocationId, ProductId};

use crate::backorder;
use crate::commit;
use crate::ledger::InventoryLedger;
use crate::line::Line;
use crate::snapshot::OrderSnapshot;

/// Allocate each line of a group independently: first eligible location with
/// sufficient capacity wins. Processing order is the group's list order and
/// is an explicit tie-break; lines sharing a product consume the shared
/// working ledger in that order.
///
/// Lines no location can cover fall through to the closest-stocking backorder
/// fallback.
pub fn allocate_by_line(
    lines: &mut [Line],
    ledger: &mut InventoryLedger,
    snapshot: &OrderSnapshot,
) {
    reset_group_products(lines.iter(), ledger);

    for line in lines.iter_mut() {
        let chosen = first_fit(line, ledger);
        match chosen {
            Some(location) => {
                debug!(
                    line_no = line.line_no,
                    product = %line.product_id,
                    location = %location,
                    "line sourced"
                );
                commit::commit_line(line, &location, ledger, snapshot);
            }
            None => backorder::closest_stocking(line, ledger, snapshot),
        }
    }
}

/// Commit a whole bypass group (vendor-direct, no-source) to the selling
/// warehouse without consulting inventory.
pub fn allocate_bypass(lines: &mut [Line], ledger: &InventoryLedger, snapshot: &OrderSnapshot) {
    for line in lines.iter_mut() {
        commit::commit_bypass(line, &snapshot.selling_warehouse, ledger, snapshot);
    }
}

/// A new strategy is beginning for every product in this group: give each a
/// fresh working copy of the availability snapshot.
pub(crate) fn reset_group_products<'a, I>(lines: I, ledger: &mut InventoryLedger)
where
    I: IntoIterator<Item = &'a Line>,
{
    let mut seen: BTreeSet<ProductId> = BTreeSet::new();
    for line in lines {
        if seen.insert(line.product_id.clone()) {
            ledger.reset_working(&line.product_id);
        }
    }
}

fn first_fit(line: &Line, ledger: &InventoryLedger) -> Option<LocationId> {
    line.eligible
        .iter()
        .find(|location| {
            let on_hand = if line.flags.multi_line {
                ledger.working(&line.product_id, location)
            } else {
                ledger.available(&line.product_id, location)
            };
            on_hand >= line.requested_qty
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipsource_catalog::{SourcingGuideline, StockingStatus};
    use shipsource_core::ProductId;

    fn pid(s: &str) -> ProductId {
        ProductId::new(s).unwrap()
    }

    fn lid(s: &str) -> LocationId {
        LocationId::new(s).unwrap()
    }

    fn snapshot() -> OrderSnapshot {
        OrderSnapshot::new(Vec::new(), Vec::new(), lid("BR01"))
    }

    fn line_with_eligible(
        no: u32,
        product: &str,
        qty: i64,
        eligible: &[&str],
    ) -> Line {
        let mut line = Line::new(no, pid(product), qty, SourcingGuideline::BranchOnly);
        line.eligible = eligible.iter().map(|s| lid(s)).collect();
        line
    }

    #[test]
    fn first_location_with_stock_wins() {
        let mut ledger = InventoryLedger::new();
        ledger.set_available(&pid("A"), &lid("BR01"), 1);
        ledger.set_available(&pid("A"), &lid("BR02"), 10);

        let mut lines = vec![line_with_eligible(1, "A", 5, &["BR01", "BR02"])];
        allocate_by_line(&mut lines, &mut ledger, &snapshot());

        assert_eq!(lines[0].ship_from, Some(lid("BR02")));
        assert!(!lines[0].flags.backordered);
    }

    #[test]
    fn repeated_product_lines_do_not_overdraw_one_location() {
        let mut ledger = InventoryLedger::new();
        ledger.set_available(&pid("A"), &lid("BR01"), 6);
        ledger.set_available(&pid("A"), &lid("BR02"), 4);

        let mut lines = vec![
            line_with_eligible(1, "A", 4, &["BR01", "BR02"]),
            line_with_eligible(2, "A", 4, &["BR01", "BR02"]),
        ];
        for l in &mut lines {
            l.flags.multi_line = true;
        }
        allocate_by_line(&mut lines, &mut ledger, &snapshot());

        // Line 1 takes BR01 (6 on hand); the working remainder there (2) cannot
        // cover line 2, which moves on to BR02.
        assert_eq!(lines[0].ship_from, Some(lid("BR01")));
        assert_eq!(lines[1].ship_from, Some(lid("BR02")));
        assert!(!lines[1].flags.backordered);
    }

    #[test]
    fn shortfall_falls_through_to_closest_stocking() {
        let mut ledger = InventoryLedger::new();
        ledger.set_available(&pid("A"), &lid("BR01"), 1);
        ledger.set_available(&pid("A"), &lid("BR02"), 2);
        ledger.set_stocking(&pid("A"), &lid("BR02"), StockingStatus::Stocked);

        let mut lines = vec![line_with_eligible(1, "A", 5, &["BR01", "BR02"])];
        allocate_by_line(&mut lines, &mut ledger, &snapshot());

        assert_eq!(lines[0].ship_from, Some(lid("BR02")));
        assert!(lines[0].flags.backordered);
        assert_eq!(lines[0].backordered_qty, 3);
        assert!(lines[0].flags.stockout_fallback);
    }

    #[test]
    fn allocation_is_deterministic() {
        let run = || {
            let mut ledger = InventoryLedger::new();
            ledger.set_available(&pid("A"), &lid("BR01"), 7);
            ledger.set_available(&pid("A"), &lid("BR02"), 7);
            ledger.set_available(&pid("B"), &lid("BR02"), 3);

            let mut lines = vec![
                line_with_eligible(1, "A", 5, &["BR01", "BR02"]),
                line_with_eligible(2, "B", 3, &["BR01", "BR02"]),
            ];
            allocate_by_line(&mut lines, &mut ledger, &snapshot());
            lines
                .into_iter()
                .map(|l| (l.line_no, l.ship_from))
                .collect::<Vec<_>>()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn bypass_group_commits_selling_warehouse() {
        let ledger = InventoryLedger::new();
        let mut lines = vec![{
            let mut l = Line::new(1, pid("V1"), 2, SourcingGuideline::VendorDirect);
            l.eligible = Vec::new();
            l
        }];
        allocate_bypass(&mut lines, &ledger, &snapshot());

        assert_eq!(lines[0].ship_from, Some(lid("BR01")));
        assert!(!lines[0].flags.backordered);
    }
}
