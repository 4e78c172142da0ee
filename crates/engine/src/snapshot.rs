//! Per-order data snapshot.

use std::collections::HashMap;

use shipsource_catalog::ItemAttributes;
use shipsource_core::{LocationId, ProductId};
use shipsource_network::{rank_locations, Location};

/// The point-in-time tables one sourcing run reads: item attributes by
/// product and the ranked candidate network. Built once per order, read-only
/// during allocation.
#[derive(Debug, Clone)]
pub struct OrderSnapshot {
    items: HashMap<ProductId, ItemAttributes>,
    /// Canonical rank order; first-fit order for every location scan.
    locations: Vec<Location>,
    index: HashMap<LocationId, usize>,
    pub selling_warehouse: LocationId,
    /// The destination's preferred distribution center, if the network has
    /// one.
    pub preferred_dc: Option<LocationId>,
}

impl OrderSnapshot {
    pub fn new(
        items: Vec<ItemAttributes>,
        mut locations: Vec<Location>,
        selling_warehouse: LocationId,
    ) -> Self {
        rank_locations(&mut locations);

        let index = locations
            .iter()
            .enumerate()
            .map(|(i, l)| (l.id.clone(), i))
            .collect();

        let preferred_dc = locations
            .iter()
            .find(|l| l.flags.preferred && l.flags.distribution_center)
            .map(|l| l.id.clone());

        let items = items
            .into_iter()
            .map(|attrs| (attrs.product_id.clone(), attrs))
            .collect();

        Self {
            items,
            locations,
            index,
            selling_warehouse,
            preferred_dc,
        }
    }

    pub fn item(&self, product: &ProductId) -> Option<&ItemAttributes> {
        self.items.get(product)
    }

    pub fn location(&self, id: &LocationId) -> Option<&Location> {
        self.index.get(id).map(|&i| &self.locations[i])
    }

    /// All candidate locations in rank order.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location_name(&self, id: &LocationId) -> Option<String> {
        self.location(id).map(|l| l.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipsource_core::Address;
    use shipsource_network::LocationFlags;

    fn loc(id: &str, flags: LocationFlags, transit: u32, dist: f64) -> Location {
        Location {
            id: LocationId::new(id).unwrap(),
            name: format!("Location {id}"),
            address: Address::new("", "", "", "00000").unwrap(),
            distance_miles: dist,
            transit_days: transit,
            flags,
            estimated_ship_date: None,
            estimated_delivery_date: None,
        }
    }

    #[test]
    fn snapshot_ranks_locations_and_resolves_preferred_dc() {
        let dc = LocationFlags {
            distribution_center: true,
            preferred: true,
            ..Default::default()
        };
        let branch = LocationFlags {
            branch: true,
            ..Default::default()
        };
        let snapshot = OrderSnapshot::new(
            Vec::new(),
            vec![loc("BR01", branch, 1, 5.0), loc("DC01", dc, 2, 300.0)],
            LocationId::new("BR01").unwrap(),
        );

        assert_eq!(snapshot.locations()[0].id.as_str(), "DC01");
        assert_eq!(
            snapshot.preferred_dc.as_ref().map(|l| l.as_str()),
            Some("DC01")
        );
        assert_eq!(
            snapshot.location_name(&LocationId::new("BR01").unwrap()),
            Some("Location BR01".to_string())
        );
    }
}
