//! GeoScope Geo - Grid geometry and geographic math
//!
//! This crate holds the spatial index the cascade classifies against
//! (fixed-size latitude/longitude grid cells) and the geo math used when
//! training representative coordinates.

pub mod geomath;
pub mod grid;

pub use grid::{CellId, Grid, GridCell};
