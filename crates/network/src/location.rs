//! Candidate source locations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shipsource_core::{Address, LocationId};

/// Capability flags carried by a location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationFlags {
    pub distribution_center: bool,
    pub branch: bool,
    pub store_direct: bool,
    pub warehouse_software: bool,
    pub ship_hub: bool,
    /// Preferred for the order's destination, as resolved by the
    /// location/distance collaborator.
    pub preferred: bool,
    pub overpack_capable: bool,
}

/// A candidate source for an order, read-only during allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    /// Display/routing identifier attached to committed lines.
    pub name: String,
    pub address: Address,
    pub distance_miles: f64,
    pub transit_days: u32,
    pub flags: LocationFlags,
    pub estimated_ship_date: Option<NaiveDate>,
    pub estimated_delivery_date: Option<NaiveDate>,
}

/// Sort locations into the canonical rank order the allocators iterate in:
/// preferred desc, distribution-center desc, ship-hub desc,
/// warehouse-software desc, then business transit days and distance, both
/// ascending.
///
/// The sort is stable, so fully-tied locations keep their input order and the
/// ranking stays deterministic for identical inputs.
pub fn rank_locations(locations: &mut [Location]) {
    locations.sort_by(|a, b| {
        b.flags
            .preferred
            .cmp(&a.flags.preferred)
            .then(b.flags.distribution_center.cmp(&a.flags.distribution_center))
            .then(b.flags.ship_hub.cmp(&a.flags.ship_hub))
            .then(b.flags.warehouse_software.cmp(&a.flags.warehouse_software))
            .then(a.transit_days.cmp(&b.transit_days))
            .then(a.distance_miles.total_cmp(&b.distance_miles))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(id: &str, flags: LocationFlags, transit_days: u32, distance_miles: f64) -> Location {
        Location {
            id: LocationId::new(id).unwrap(),
            name: id.to_string(),
            address: Address::new("", "", "", "00000").unwrap(),
            distance_miles,
            transit_days,
            flags,
            estimated_ship_date: None,
            estimated_delivery_date: None,
        }
    }

    #[test]
    fn preferred_outranks_everything() {
        let mut locs = vec![
            loc(
                "DC01",
                LocationFlags {
                    distribution_center: true,
                    ship_hub: true,
                    ..Default::default()
                },
                1,
                10.0,
            ),
            loc(
                "BR09",
                LocationFlags {
                    branch: true,
                    preferred: true,
                    ..Default::default()
                },
                4,
                900.0,
            ),
        ];
        rank_locations(&mut locs);
        assert_eq!(locs[0].id.as_str(), "BR09");
    }

    #[test]
    fn transit_then_distance_break_capability_ties() {
        let branch = LocationFlags {
            branch: true,
            ..Default::default()
        };
        let mut locs = vec![
            loc("BR03", branch, 2, 50.0),
            loc("BR02", branch, 1, 80.0),
            loc("BR01", branch, 1, 20.0),
        ];
        rank_locations(&mut locs);
        let order: Vec<&str> = locs.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(order, vec!["BR01", "BR02", "BR03"]);
    }

    #[test]
    fn full_ties_keep_input_order() {
        let branch = LocationFlags {
            branch: true,
            ..Default::default()
        };
        let mut locs = vec![loc("BR07", branch, 2, 50.0), loc("BR04", branch, 2, 50.0)];
        rank_locations(&mut locs);
        assert_eq!(locs[0].id.as_str(), "BR07");
    }
}
