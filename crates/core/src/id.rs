//! Strongly-typed identifiers used across the sourcing domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SourcingError;

/// Identifier of a product (item number in the selling system).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

/// Identifier of a candidate source location (branch / distribution center).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(String);

/// Identifier of a sales order in the selling system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

macro_rules! impl_code_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create an identifier from a raw code.
            ///
            /// Codes are trimmed; blank codes are rejected.
            pub fn new(code: impl Into<String>) -> Result<Self, SourcingError> {
                let code = code.into();
                let trimmed = code.trim();
                if trimmed.is_empty() {
                    return Err(SourcingError::validation(concat!(
                        $name,
                        " cannot be blank"
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $t {
            type Err = SourcingError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

impl_code_newtype!(ProductId, "ProductId");
impl_code_newtype!(LocationId, "LocationId");
impl_code_newtype!(OrderId, "OrderId");

/// Identifier of one sourcing run over one order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourcingRunId(Uuid);

impl SourcingRunId {
    /// Create a new run identifier.
    ///
    /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
    /// for determinism.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SourcingRunId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for SourcingRunId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_id_trims_and_rejects_blank() {
        let id = ProductId::new("  A100 ").unwrap();
        assert_eq!(id.as_str(), "A100");

        assert!(ProductId::new("   ").is_err());
        assert!(ProductId::new("").is_err());
    }

    #[test]
    fn location_id_parses_from_str() {
        let id: LocationId = "DC01".parse().unwrap();
        assert_eq!(id.as_str(), "DC01");
    }
}
