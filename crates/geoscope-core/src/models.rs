pub mod cascade;
pub mod classification;
pub mod coordinate;
pub mod distribution;

pub use cascade::{validate_grid_size, CacheLimits, CascadeConfig};
pub use classification::{Classification, ScoredCategory};
pub use coordinate::Coordinate;
pub use distribution::CategoryDistribution;
