//! Allocation working state for order lines.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use shipsource_catalog::SourcingGuideline;
use shipsource_core::{LocationId, ProductId};

/// Named boolean requirements a line can impose on candidate locations.
///
/// Requirements are a conjunction; evaluation order does not affect the
/// result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SpecialRequirement {
    OverpackCapable,
}

/// Flags accumulated on a line as allocation progresses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineFlags {
    /// The product appears on more than one line of this order.
    pub multi_line: bool,
    /// No location satisfied guideline + requirements; the eligible list was
    /// rebuilt from the guideline rule alone.
    pub no_eligible_location: bool,
    /// Committed short; `backordered_qty` records the unmet quantity.
    pub backordered: bool,
    /// Sourced by the closest-stocking fallback after every eligible
    /// location came up short.
    pub stockout_fallback: bool,
}

/// One order line being sourced.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub line_no: u32,
    pub product_id: ProductId,
    pub requested_qty: i64,
    pub guideline: SourcingGuideline,
    pub ship_from: Option<LocationId>,
    pub ship_from_name: Option<String>,
    /// Available quantity observed at the assigned location at commit time.
    pub observed_qty: i64,
    pub backordered_qty: i64,
    pub flags: LineFlags,
    /// Eligible locations in rank order; first-fit order for both allocators.
    pub eligible: Vec<LocationId>,
    pub requirements: BTreeSet<SpecialRequirement>,
}

impl Line {
    pub fn new(
        line_no: u32,
        product_id: ProductId,
        requested_qty: i64,
        guideline: SourcingGuideline,
    ) -> Self {
        Self {
            line_no,
            product_id,
            requested_qty,
            guideline,
            ship_from: None,
            ship_from_name: None,
            observed_qty: 0,
            backordered_qty: 0,
            flags: LineFlags::default(),
            eligible: Vec::new(),
            requirements: BTreeSet::new(),
        }
    }

    pub fn is_sourced(&self) -> bool {
        self.ship_from.is_some()
    }
}

/// Why a line was excluded from allocation entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExcludedReason {
    BlankProduct,
    NonPositiveQuantity,
    /// Item master data carried no resolvable sourcing guideline.
    NoGuideline,
}

impl core::fmt::Display for ExcludedReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::BlankProduct => "no product id",
            Self::NonPositiveQuantity => "no quantity",
            Self::NoGuideline => "no sourcing guideline",
        };
        f.write_str(s)
    }
}

/// A line left out of allocation, kept for the write-back.
#[derive(Debug, Clone, PartialEq)]
pub struct ExcludedLine {
    pub line_no: u32,
    pub product: String,
    pub quantity: i64,
    pub reason: ExcludedReason,
}

/// Order lines grouped by sourcing guideline.
///
/// The `BTreeMap` key order fixes group processing order, which is part of
/// the engine's determinism contract. Lines within a group keep their order
/// of appearance on the order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineGroups {
    groups: BTreeMap<SourcingGuideline, Vec<Line>>,
    excluded: Vec<ExcludedLine>,
}

impl LineGroups {
    pub fn push(&mut self, line: Line) {
        self.groups.entry(line.guideline).or_default().push(line);
    }

    pub fn exclude(&mut self, line: ExcludedLine) {
        self.excluded.push(line);
    }

    pub fn excluded(&self) -> &[ExcludedLine] {
        &self.excluded
    }

    pub fn iter(&self) -> impl Iterator<Item = (SourcingGuideline, &[Line])> {
        self.groups.iter().map(|(g, lines)| (*g, lines.as_slice()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SourcingGuideline, &mut Vec<Line>)> {
        self.groups.iter_mut().map(|(g, lines)| (*g, lines))
    }

    pub fn group_mut(&mut self, guideline: SourcingGuideline) -> Option<&mut Vec<Line>> {
        self.groups.get_mut(&guideline)
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.groups.values().flatten()
    }

    pub fn line_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_iterate_in_guideline_order() {
        let mut groups = LineGroups::default();
        groups.push(Line::new(
            1,
            ProductId::new("Z9").unwrap(),
            1,
            SourcingGuideline::Pickup,
        ));
        groups.push(Line::new(
            2,
            ProductId::new("A1").unwrap(),
            1,
            SourcingGuideline::FlexibleDc,
        ));
        groups.push(Line::new(
            3,
            ProductId::new("B2").unwrap(),
            1,
            SourcingGuideline::BranchOnly,
        ));

        let order: Vec<SourcingGuideline> = groups.iter().map(|(g, _)| g).collect();
        assert_eq!(
            order,
            vec![
                SourcingGuideline::FlexibleDc,
                SourcingGuideline::BranchOnly,
                SourcingGuideline::Pickup,
            ]
        );
    }

    #[test]
    fn lines_within_a_group_keep_order_of_appearance() {
        let mut groups = LineGroups::default();
        for n in [5, 2, 9] {
            groups.push(Line::new(
                n,
                ProductId::new(format!("P{n}")).unwrap(),
                1,
                SourcingGuideline::BranchOnly,
            ));
        }
        let nos: Vec<u32> = groups.lines().map(|l| l.line_no).collect();
        assert_eq!(nos, vec![5, 2, 9]);
    }
}
