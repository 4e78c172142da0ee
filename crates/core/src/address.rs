//! Destination address value object.

use serde::{Deserialize, Serialize};

use crate::error::SourcingError;

/// A shipping destination.
///
/// The postal code is the only field the ranking pipeline requires; street
/// fields ride along for freight estimation and write-back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
}

impl Address {
    pub fn new(
        line1: impl Into<String>,
        city: impl Into<String>,
        region: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Result<Self, SourcingError> {
        let postal_code = postal_code.into();
        if postal_code.trim().is_empty() {
            return Err(SourcingError::MissingDestination);
        }
        Ok(Self {
            line1: line1.into(),
            city: city.into(),
            region: region.into(),
            postal_code: postal_code.trim().to_string(),
        })
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }
}
