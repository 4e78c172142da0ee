//! `shipsource-catalog` — item master data as the sourcing engine sees it.

pub mod guideline;
pub mod item;

pub use guideline::SourcingGuideline;
pub use item::{ItemAttributes, ShipMethod, StockingStatus};
