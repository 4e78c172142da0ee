//! Sourcing guidelines: the per-product policy constraining which location
//! types may fulfill it.

use serde::{Deserialize, Serialize};

/// Closed set of sourcing guidelines.
///
/// The `Ord` derive gives guideline groups a fixed processing order, which is
/// part of the engine's determinism contract.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SourcingGuideline {
    /// Distribution center preferred, branch acceptable; ships as a set.
    FlexibleDc,
    /// Branch locations only.
    BranchOnly,
    /// Store-direct locations only.
    StoreDirect,
    /// Shipped by the vendor; the selling warehouse is the ship-from of record.
    VendorDirect,
    /// Not sourced automatically.
    NoSource,
    /// Customer pickup; the whole group must be consolidated at one location.
    Pickup,
}

impl SourcingGuideline {
    /// Guidelines whose groups must ship as a set from a single location.
    ///
    /// These are also the guidelines a broken bulk pack is reclassified away
    /// from: a broken case cannot ship from a distribution center.
    pub fn ships_as_set(self) -> bool {
        matches!(self, Self::FlexibleDc | Self::Pickup)
    }

    /// Guidelines that never consult inventory or the location network; the
    /// selling warehouse is committed directly.
    pub fn bypasses_network(self) -> bool {
        matches!(self, Self::VendorDirect | Self::NoSource)
    }
}

impl core::fmt::Display for SourcingGuideline {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::FlexibleDc => "flexible_dc",
            Self::BranchOnly => "branch_only",
            Self::StoreDirect => "store_direct",
            Self::VendorDirect => "vendor_direct",
            Self::NoSource => "no_source",
            Self::Pickup => "pickup",
        };
        f.write_str(s)
    }
}
