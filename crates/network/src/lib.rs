//! `shipsource-network` — candidate source locations and their ranking.

pub mod location;

pub use location::{rank_locations, Location, LocationFlags};
