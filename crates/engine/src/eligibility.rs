//! Eligibility resolution: which locations may fulfill each line.

use std::collections::BTreeSet;

use tracing::debug;

use shipsource_catalog::SourcingGuideline;
use shipsource_core::LocationId;
use shipsource_network::Location;

use crate::line::{LineGroups, SpecialRequirement};
use crate::snapshot::OrderSnapshot;

/// Populate every line's eligible-location list, in rank order.
///
/// A location qualifies when it satisfies the line's guideline rule and all
/// of its special requirements. A line for which nothing qualifies is flagged
/// `no_eligible_location` and its list is rebuilt from the guideline rule
/// alone, so the allocators keep a non-empty fallback pool whenever at least
/// one guideline-matching location exists. Vendor-direct and no-source lines
/// bypass the scan entirely.
pub fn resolve_eligibility(groups: &mut LineGroups, snapshot: &OrderSnapshot) {
    for (guideline, lines) in groups.iter_mut() {
        if guideline.bypasses_network() {
            continue;
        }
        for line in lines.iter_mut() {
            line.eligible = scan(snapshot, guideline, Some(&line.requirements));
            if line.eligible.is_empty() {
                debug!(
                    line_no = line.line_no,
                    product = %line.product_id,
                    %guideline,
                    "no location satisfies guideline and requirements; relaxing to guideline only"
                );
                line.flags.no_eligible_location = true;
                line.eligible = scan(snapshot, guideline, None);
            }
        }
    }
}

fn scan(
    snapshot: &OrderSnapshot,
    guideline: SourcingGuideline,
    requirements: Option<&BTreeSet<SpecialRequirement>>,
) -> Vec<LocationId> {
    snapshot
        .locations()
        .iter()
        .filter(|loc| guideline_matches(guideline, loc))
        .filter(|loc| requirements.map_or(true, |reqs| requirements_met(reqs, loc)))
        .map(|loc| loc.id.clone())
        .collect()
}

fn guideline_matches(guideline: SourcingGuideline, location: &Location) -> bool {
    match guideline {
        // Pickup groups consolidate at one location later; the location pool
        // is the same DC-or-branch pool the flexible guideline uses.
        SourcingGuideline::FlexibleDc | SourcingGuideline::Pickup => {
            location.flags.distribution_center || location.flags.branch
        }
        SourcingGuideline::BranchOnly => location.flags.branch,
        SourcingGuideline::StoreDirect => location.flags.store_direct,
        SourcingGuideline::VendorDirect | SourcingGuideline::NoSource => false,
    }
}

fn requirements_met(requirements: &BTreeSet<SpecialRequirement>, location: &Location) -> bool {
    requirements.iter().all(|req| match req {
        SpecialRequirement::OverpackCapable => location.flags.overpack_capable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::Line;
    use shipsource_core::{Address, ProductId};
    use shipsource_network::LocationFlags;

    fn loc(id: &str, flags: LocationFlags, transit: u32) -> Location {
        Location {
            id: LocationId::new(id).unwrap(),
            name: id.to_string(),
            address: Address::new("", "", "", "00000").unwrap(),
            distance_miles: 10.0,
            transit_days: transit,
            flags,
            estimated_ship_date: None,
            estimated_delivery_date: None,
        }
    }

    fn network() -> Vec<Location> {
        vec![
            loc(
                "DC01",
                LocationFlags {
                    distribution_center: true,
                    overpack_capable: true,
                    ..Default::default()
                },
                1,
            ),
            loc(
                "BR01",
                LocationFlags {
                    branch: true,
                    ..Default::default()
                },
                2,
            ),
            loc(
                "BR02",
                LocationFlags {
                    branch: true,
                    overpack_capable: true,
                    ..Default::default()
                },
                3,
            ),
            loc(
                "ST01",
                LocationFlags {
                    store_direct: true,
                    ..Default::default()
                },
                4,
            ),
        ]
    }

    fn groups_with(line: Line) -> LineGroups {
        let mut groups = LineGroups::default();
        groups.push(line);
        groups
    }

    fn eligible_ids(groups: &LineGroups) -> Vec<&str> {
        groups
            .lines()
            .next()
            .unwrap()
            .eligible
            .iter()
            .map(|l| l.as_str())
            .collect()
    }

    #[test]
    fn flexible_dc_takes_dcs_and_branches_in_rank_order() {
        let snapshot = OrderSnapshot::new(
            Vec::new(),
            network(),
            LocationId::new("BR01").unwrap(),
        );
        let mut groups = groups_with(Line::new(
            1,
            ProductId::new("A100").unwrap(),
            1,
            SourcingGuideline::FlexibleDc,
        ));
        resolve_eligibility(&mut groups, &snapshot);
        assert_eq!(eligible_ids(&groups), vec!["DC01", "BR01", "BR02"]);
    }

    #[test]
    fn branch_only_excludes_dcs_and_stores() {
        let snapshot = OrderSnapshot::new(
            Vec::new(),
            network(),
            LocationId::new("BR01").unwrap(),
        );
        let mut groups = groups_with(Line::new(
            1,
            ProductId::new("A100").unwrap(),
            1,
            SourcingGuideline::BranchOnly,
        ));
        resolve_eligibility(&mut groups, &snapshot);
        assert_eq!(eligible_ids(&groups), vec!["BR01", "BR02"]);
    }

    #[test]
    fn overpack_requirement_filters_locations() {
        let snapshot = OrderSnapshot::new(
            Vec::new(),
            network(),
            LocationId::new("BR01").unwrap(),
        );
        let mut line = Line::new(
            1,
            ProductId::new("A100").unwrap(),
            1,
            SourcingGuideline::BranchOnly,
        );
        line.requirements.insert(SpecialRequirement::OverpackCapable);
        let mut groups = groups_with(line);
        resolve_eligibility(&mut groups, &snapshot);

        assert_eq!(eligible_ids(&groups), vec!["BR02"]);
        assert!(!groups.lines().next().unwrap().flags.no_eligible_location);
    }

    #[test]
    fn unsatisfiable_requirements_relax_to_guideline_only() {
        // No store-direct location is overpack capable.
        let snapshot = OrderSnapshot::new(
            Vec::new(),
            network(),
            LocationId::new("BR01").unwrap(),
        );
        let mut line = Line::new(
            1,
            ProductId::new("A100").unwrap(),
            1,
            SourcingGuideline::StoreDirect,
        );
        line.requirements.insert(SpecialRequirement::OverpackCapable);
        let mut groups = groups_with(line);
        resolve_eligibility(&mut groups, &snapshot);

        let l = groups.lines().next().unwrap();
        assert!(l.flags.no_eligible_location);
        assert_eq!(eligible_ids(&groups), vec!["ST01"]);
    }

    #[test]
    fn vendor_direct_lines_keep_an_empty_pool() {
        let snapshot = OrderSnapshot::new(
            Vec::new(),
            network(),
            LocationId::new("BR01").unwrap(),
        );
        let mut groups = groups_with(Line::new(
            1,
            ProductId::new("A100").unwrap(),
            1,
            SourcingGuideline::VendorDirect,
        ));
        resolve_eligibility(&mut groups, &snapshot);

        let l = groups.lines().next().unwrap();
        assert!(l.eligible.is_empty());
        assert!(!l.flags.no_eligible_location);
    }
}
