//! Guideline classification: order lines → guideline groups.

use std::collections::HashMap;

use tracing::warn;

use shipsource_catalog::SourcingGuideline;
use shipsource_core::{ProductId, SourcingError};
use shipsource_orders::SalesOrder;

use crate::line::{ExcludedLine, ExcludedReason, Line, LineGroups, SpecialRequirement};
use crate::snapshot::OrderSnapshot;

/// Group the order's lines by sourcing guideline.
///
/// Lines with a blank product code or non-positive quantity are excluded
/// (flagged in the write-back, never allocated). A usable product code absent
/// from the snapshot's item table is fatal for the order; an item present but
/// carrying no resolvable guideline degrades only that line.
///
/// Broken bulk packs are reclassified here: a case-packed item on a
/// ship-as-a-set guideline whose requested quantity is not an exact multiple
/// of the case quantity moves to the branch-only guideline, because a broken
/// case cannot ship from a distribution center.
pub fn classify(order: &SalesOrder, snapshot: &OrderSnapshot) -> Result<LineGroups, SourcingError> {
    let mut groups = LineGroups::default();

    // Count product occurrences across usable lines up front; repeats share
    // the multi-line working ledger.
    let mut occurrences: HashMap<&str, u32> = HashMap::new();
    for line in order.lines.iter().filter(|l| l.is_usable()) {
        *occurrences.entry(line.product.trim()).or_insert(0) += 1;
    }

    for order_line in &order.lines {
        if order_line.product.trim().is_empty() {
            groups.exclude(ExcludedLine {
                line_no: order_line.line_no,
                product: order_line.product.clone(),
                quantity: order_line.quantity,
                reason: ExcludedReason::BlankProduct,
            });
            continue;
        }
        if order_line.quantity <= 0 {
            groups.exclude(ExcludedLine {
                line_no: order_line.line_no,
                product: order_line.product.clone(),
                quantity: order_line.quantity,
                reason: ExcludedReason::NonPositiveQuantity,
            });
            continue;
        }

        let product_id = ProductId::new(&order_line.product)?;
        let attrs = snapshot
            .item(&product_id)
            .ok_or_else(|| SourcingError::unknown_product(product_id.as_str()))?;

        let Some(mut guideline) = attrs.guideline else {
            warn!(
                order_id = %order.order_id,
                line_no = order_line.line_no,
                product = %product_id,
                "line excluded: item has no sourcing guideline"
            );
            groups.exclude(ExcludedLine {
                line_no: order_line.line_no,
                product: order_line.product.clone(),
                quantity: order_line.quantity,
                reason: ExcludedReason::NoGuideline,
            });
            continue;
        };

        if guideline.ships_as_set() && attrs.breaks_case(order_line.quantity) {
            guideline = SourcingGuideline::BranchOnly;
        }

        let mut line = Line::new(
            order_line.line_no,
            product_id,
            order_line.quantity,
            guideline,
        );
        line.flags.multi_line = occurrences
            .get(order_line.product.trim())
            .copied()
            .unwrap_or(0)
            > 1;
        if attrs.demands_overpack() {
            line.requirements.insert(SpecialRequirement::OverpackCapable);
        }

        groups.push(line);
    }

    Ok(groups)
}
