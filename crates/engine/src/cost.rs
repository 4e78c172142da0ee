//! Freight grouping and the shipping-cost threshold.
//!
//! Cost is a global decision, not a per-line one: the caller estimates one
//! freight cost per distinct ship-from and compares the sum against a
//! multiple of the shipping price quoted on the order.

use shipsource_core::LocationId;

use crate::line::Line;
use crate::snapshot::OrderSnapshot;

/// One prospective shipment: the sourced lines committed to a single
/// ship-from and their cumulative item weight in pounds.
#[derive(Debug, Clone, PartialEq)]
pub struct FreightGroup {
    pub ship_from: LocationId,
    pub weight: f64,
    pub line_nos: Vec<u32>,
}

/// Group sourced lines by ship-from, in first-seen order, summing item
/// weight × quantity per group. Unsourced lines and products missing a
/// weight contribute nothing.
pub fn freight_groups(lines: &[Line], snapshot: &OrderSnapshot) -> Vec<FreightGroup> {
    let mut groups: Vec<FreightGroup> = Vec::new();
    for line in lines {
        let Some(ship_from) = &line.ship_from else {
            continue;
        };
        let weight = snapshot
            .item(&line.product_id)
            .map(|attrs| attrs.weight * line.requested_qty as f64)
            .unwrap_or(0.0);

        match groups.iter_mut().find(|g| &g.ship_from == ship_from) {
            Some(group) => {
                group.weight += weight;
                group.line_nos.push(line.line_no);
            }
            None => groups.push(FreightGroup {
                ship_from: ship_from.clone(),
                weight,
                line_nos: vec![line.line_no],
            }),
        }
    }
    groups
}

/// The threshold test: a cumulative estimate is excessive when it exceeds
/// `multiplier` × the shipping price quoted on the order (both in the
/// smallest currency unit).
pub fn exceeds_threshold(total_estimate: u64, quoted_price: u64, multiplier: f64) -> bool {
    total_estimate as f64 > quoted_price as f64 * multiplier
}

/// Clear ship-from state ahead of a re-allocation pass (the cost-triggered
/// switch from per-line to complete-order sourcing).
pub fn clear_assignments(lines: &mut [Line]) {
    for line in lines {
        line.ship_from = None;
        line.ship_from_name = None;
        line.observed_qty = 0;
        line.backordered_qty = 0;
        line.flags.backordered = false;
        line.flags.stockout_fallback = false;
    }
}
