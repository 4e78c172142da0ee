//! Per-product attributes resolved from the item-data collaborator.

use serde::{Deserialize, Serialize};

use shipsource_core::ProductId;

use crate::guideline::SourcingGuideline;

/// How an item travels when shipped to a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipMethod {
    /// Small parcel; subject to overpack rules.
    Parcel,
    /// Less-than-truckload carrier load; never overpacked.
    Ltl,
}

/// Whether a location actively stocks a product.
///
/// `Unknown` covers locations missing from the stocking table; the backorder
/// resolver treats it the same as `NotStocked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockingStatus {
    Stocked,
    NotStocked,
    Unknown,
}

/// Point-in-time item attributes for one sourcing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAttributes {
    pub product_id: ProductId,
    /// `None` when the selling system carries no resolvable guideline; the
    /// affected line degrades rather than failing the order.
    pub guideline: Option<SourcingGuideline>,
    /// Unit weight in pounds, used for freight estimation.
    pub weight: f64,
    pub vendor: String,
    /// Case-packed item.
    pub bulk_pack: bool,
    /// Units per case; meaningful only when `bulk_pack` is set.
    pub bulk_pack_qty: i64,
    /// Item must ship from an overpack-capable location unless it travels LTL.
    pub overpack_required: bool,
    pub ship_method: ShipMethod,
}

impl ItemAttributes {
    /// A requested quantity breaks the case pack when the item is case-packed
    /// and the quantity is not an exact multiple of the case quantity.
    pub fn breaks_case(&self, quantity: i64) -> bool {
        self.bulk_pack && self.bulk_pack_qty > 0 && quantity % self.bulk_pack_qty != 0
    }

    /// Overpack capability is demanded of a location only for parcel-shipped
    /// items that require it.
    pub fn demands_overpack(&self) -> bool {
        self.overpack_required && self.ship_method != ShipMethod::Ltl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(bulk_pack: bool, bulk_pack_qty: i64) -> ItemAttributes {
        ItemAttributes {
            product_id: ProductId::new("A100").unwrap(),
            guideline: Some(SourcingGuideline::FlexibleDc),
            weight: 2.5,
            vendor: "ACME".to_string(),
            bulk_pack,
            bulk_pack_qty,
            overpack_required: false,
            ship_method: ShipMethod::Parcel,
        }
    }

    #[test]
    fn exact_case_multiples_do_not_break_the_pack() {
        let it = item(true, 6);
        assert!(!it.breaks_case(12));
        assert!(it.breaks_case(8));
    }

    #[test]
    fn non_bulk_items_never_break() {
        let it = item(false, 0);
        assert!(!it.breaks_case(7));
    }

    #[test]
    fn zero_case_quantity_never_breaks() {
        // A zero case quantity must not reach the modulo.
        let it = item(true, 0);
        assert!(!it.breaks_case(7));
    }

    #[test]
    fn ltl_items_do_not_demand_overpack() {
        let mut it = item(false, 0);
        it.overpack_required = true;
        it.ship_method = ShipMethod::Ltl;
        assert!(!it.demands_overpack());

        it.ship_method = ShipMethod::Parcel;
        assert!(it.demands_overpack());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: exact case multiples never break the pack, and any
            /// remainder always does.
            #[test]
            fn case_breakage_is_exactly_non_multiples(
                case_qty in 1i64..50,
                multiples in 1i64..50,
                remainder in 0i64..50,
            ) {
                let it = item(true, case_qty);
                let remainder = remainder % case_qty;
                let qty = case_qty * multiples + remainder;
                prop_assert_eq!(it.breaks_case(qty), remainder != 0);
            }
        }
    }
}
