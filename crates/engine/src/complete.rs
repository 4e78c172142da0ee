//! Complete-order allocation: ship a whole guideline group from one location.
//!
//! A greedy branch-reduction search, not exhaustive backtracking: when the
//! group shares no common location, the line with the fewest options is
//! evicted and retried later as its own (possibly singleton) group. Evicted
//! lines are never re-tried within the same common-location search.

use std::collections::HashSet;

use tracing::debug;

use shipsource_catalog::SourcingGuideline;
use shipsource_core::LocationId;

use crate::backorder;
use crate::commit;
use crate::ledger::InventoryLedger;
use crate::line::Line;
use crate::per_line::reset_group_products;
use crate::snapshot::OrderSnapshot;

/// A group commit that landed somewhere other than the order's preferred
/// location. The caller estimates freight for the winning shipment and, over
/// threshold, re-commits the group at the preferred location via
/// [`commit_preferred`]. Returned as a value so the engine never suspends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostReview {
    pub guideline: SourcingGuideline,
    pub winner: LocationId,
    pub preferred: LocationId,
    pub line_nos: Vec<u32>,
}

/// Allocate a guideline group as a set: every bucket of lines that still
/// shares a common location is committed to the first location (by rank) that
/// covers all of them simultaneously; buckets that cannot be covered anywhere
/// fall back to the preferred location, backorders allowed.
pub fn allocate_complete(
    lines: &mut [Line],
    ledger: &mut InventoryLedger,
    snapshot: &OrderSnapshot,
) -> Vec<CostReview> {
    let mut reviews = Vec::new();
    let mut current: Vec<usize> = (0..lines.len()).collect();

    while !current.is_empty() {
        let mut unsourced: Vec<usize> = Vec::new();

        // Shrink the bucket until it shares at least one location. The
        // intersection of a single set is itself, so a lone line always
        // passes this loop.
        let common = loop {
            let common = common_locations(lines, &current);
            if !common.is_empty() || current.len() == 1 {
                break common;
            }
            let evict_pos = fewest_eligible(lines, &current);
            let evicted = current.remove(evict_pos);
            debug!(
                line_no = lines[evicted].line_no,
                product = %lines[evicted].product_id,
                "no common location for the group; deferring line"
            );
            unsourced.push(evicted);
        };

        // A fresh working copy per involved product, once, before any
        // candidate is tried.
        reset_group_products(current.iter().map(|&i| &lines[i]), ledger);

        if common.is_empty() {
            // A lone line with nothing eligible anywhere takes the
            // single-line backorder fallback.
            for &i in &current {
                backorder::closest_stocking(&mut lines[i], ledger, snapshot);
            }
            current = unsourced;
            continue;
        }

        let guideline = lines[current[0]].guideline;
        let winner = first_full_coverage(lines, &current, &common, ledger);
        let preferred = preferred_location(snapshot, guideline, &common);

        match winner {
            Some(winner) => {
                // The validation walk charged the working ledger; restore it so
                // the shared commit routine is the only thing that charges.
                reset_group_products(current.iter().map(|&i| &lines[i]), ledger);
                for &i in &current {
                    commit::commit_line(&mut lines[i], &winner, ledger, snapshot);
                }
                debug!(lines = current.len(), location = %winner, "group sourced complete");

                if preferred != winner {
                    reviews.push(CostReview {
                        guideline,
                        winner,
                        preferred,
                        line_nos: current.iter().map(|&i| lines[i].line_no).collect(),
                    });
                }
            }
            None => {
                reset_group_products(current.iter().map(|&i| &lines[i]), ledger);
                for &i in &current {
                    commit::commit_line(&mut lines[i], &preferred, ledger, snapshot);
                }
                debug!(
                    lines = current.len(),
                    location = %preferred,
                    "no location covers the group; committed preferred location"
                );
            }
        }

        current = unsourced;
    }

    reviews
}

/// Re-commit a reviewed group at its preferred location after the freight
/// estimate came back over threshold. Working copies are re-reset first; the
/// commit may leave quantity backordered.
pub fn commit_preferred(
    lines: &mut [Line],
    review: &CostReview,
    ledger: &mut InventoryLedger,
    snapshot: &OrderSnapshot,
) {
    let member: HashSet<u32> = review.line_nos.iter().copied().collect();
    let indices: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| member.contains(&l.line_no))
        .map(|(i, _)| i)
        .collect();

    reset_group_products(indices.iter().map(|&i| &lines[i]), ledger);

    for &i in &indices {
        commit::commit_line(&mut lines[i], &review.preferred, ledger, snapshot);
    }
}

/// Intersection of the bucket's eligible sets, in the first line's rank order.
fn common_locations(lines: &[Line], current: &[usize]) -> Vec<LocationId> {
    let first = &lines[current[0]];
    if current.len() == 1 {
        return first.eligible.clone();
    }
    let rest: Vec<HashSet<&LocationId>> = current[1..]
        .iter()
        .map(|&i| lines[i].eligible.iter().collect())
        .collect();
    first
        .eligible
        .iter()
        .filter(|loc| rest.iter().all(|set| set.contains(*loc)))
        .cloned()
        .collect()
}

/// Position (within `current`) of the line with the fewest eligible
/// locations; ties go to the first occurrence.
fn fewest_eligible(lines: &[Line], current: &[usize]) -> usize {
    let mut best = 0;
    for (pos, &i) in current.iter().enumerate() {
        if lines[i].eligible.len() < lines[current[best]].eligible.len() {
            best = pos;
        }
    }
    best
}

/// Walk common locations in rank order; the first whose working quantities
/// cover every line's request, validated in line order with decrements as it
/// goes, wins. A candidate is abandoned at its first insufficient line.
fn first_full_coverage(
    lines: &[Line],
    current: &[usize],
    common: &[LocationId],
    ledger: &mut InventoryLedger,
) -> Option<LocationId> {
    'candidates: for location in common {
        for &i in current {
            let line = &lines[i];
            let working = ledger.working(&line.product_id, location);
            if working >= line.requested_qty {
                ledger.consume_working(&line.product_id, location, line.requested_qty);
            } else {
                continue 'candidates;
            }
        }
        return Some(location.clone());
    }
    None
}

/// The order's single preferred location for a group: the destination's
/// preferred distribution center (unless the guideline is branch-only), else
/// the first common location.
fn preferred_location(
    snapshot: &OrderSnapshot,
    guideline: SourcingGuideline,
    common: &[LocationId],
) -> LocationId {
    if guideline != SourcingGuideline::BranchOnly {
        if let Some(dc) = &snapshot.preferred_dc {
            return dc.clone();
        }
    }
    common[0].clone()
}
