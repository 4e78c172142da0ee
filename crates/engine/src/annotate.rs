//! Status derivation: allocation results → human-readable write-back.

use chrono::{DateTime, Utc};

use shipsource_catalog::SourcingGuideline;
use shipsource_core::SourcingRunId;
use shipsource_orders::{SalesOrder, SourcedLine, SourcingRecord};

use crate::line::{Line, LineGroups};
use crate::snapshot::OrderSnapshot;

/// Assemble the sourcing record for one run: a message and flags per line,
/// and the order-level completion flag and message.
pub fn annotate(
    order: &SalesOrder,
    groups: &LineGroups,
    snapshot: &OrderSnapshot,
    run_id: SourcingRunId,
    sourced_at: DateTime<Utc>,
) -> SourcingRecord {
    let mut lines: Vec<SourcedLine> = Vec::new();

    for excluded in groups.excluded() {
        lines.push(SourcedLine {
            line_no: excluded.line_no,
            product_id: None,
            requested_qty: excluded.quantity,
            guideline: None,
            vendor: None,
            ship_from: None,
            ship_from_name: None,
            observed_qty: 0,
            backordered_qty: 0,
            backordered: false,
            multi_line: false,
            no_eligible_location: false,
            excluded: true,
            message: format!("excluded: {}", excluded.reason),
        });
    }

    for line in groups.lines() {
        let vendor = snapshot
            .item(&line.product_id)
            .map(|attrs| attrs.vendor.clone());
        lines.push(SourcedLine {
            line_no: line.line_no,
            product_id: Some(line.product_id.clone()),
            requested_qty: line.requested_qty,
            guideline: Some(line.guideline),
            vendor: vendor.clone(),
            ship_from: line.ship_from.clone(),
            ship_from_name: line.ship_from_name.clone(),
            observed_qty: line.observed_qty,
            backordered_qty: line.backordered_qty,
            backordered: line.flags.backordered,
            multi_line: line.flags.multi_line,
            no_eligible_location: line.flags.no_eligible_location,
            excluded: false,
            message: line_message(line, vendor.as_deref()),
        });
    }

    lines.sort_by_key(|l| l.line_no);

    let excluded = lines.iter().filter(|l| l.excluded).count();
    let backordered = lines.iter().filter(|l| l.backordered).count();
    let unsourced = lines
        .iter()
        .filter(|l| !l.excluded && l.ship_from.is_none())
        .count();
    let complete = excluded == 0 && backordered == 0 && unsourced == 0;

    let message = if complete {
        "order sourced complete".to_string()
    } else {
        let mut parts = Vec::new();
        if backordered > 0 {
            parts.push(format!("{backordered} line(s) backordered"));
        }
        if excluded > 0 {
            parts.push(format!("{excluded} line(s) excluded"));
        }
        if unsourced > 0 {
            parts.push(format!("{unsourced} line(s) unsourced"));
        }
        format!("order incomplete: {}", parts.join(", "))
    };

    SourcingRecord {
        order_id: order.order_id.clone(),
        run_id,
        sourced_at,
        complete,
        message,
        lines,
    }
}

fn line_message(line: &Line, vendor: Option<&str>) -> String {
    let place = line
        .ship_from_name
        .clone()
        .or_else(|| line.ship_from.as_ref().map(|l| l.to_string()))
        .unwrap_or_else(|| "unassigned".to_string());

    match line.guideline {
        SourcingGuideline::VendorDirect => {
            format!("sourced direct from vendor {}", vendor.unwrap_or("unknown"))
        }
        SourcingGuideline::NoSource => "not sourced automatically; review required".to_string(),
        _ if line.flags.stockout_fallback => format!(
            "no available locations; {} backordered at {place}",
            line.backordered_qty
        ),
        _ if line.flags.backordered => {
            format!("sourced from {place}; {} backordered", line.backordered_qty)
        }
        SourcingGuideline::Pickup => format!("for pickup; sourced from {place}"),
        _ => format!("sourced from {place}"),
    }
}
