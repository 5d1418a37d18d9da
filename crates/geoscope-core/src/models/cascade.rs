use serde::{Deserialize, Serialize};

use crate::error::{GeoscopeError, Result};

/// Largest admissible grid cell size in degrees
pub const MAX_GRID_SIZE: f64 = 180.0;

/// Default upper size of the coarse term cache
pub const DEFAULT_CACHE_UPPER: usize = 100_000;

/// Default size the coarse term cache is shrunk to on eviction
pub const DEFAULT_CACHE_LOWER: usize = 75_000;

/// Validate a grid cell size in degrees
pub fn validate_grid_size(size: f64) -> Result<()> {
    if size.is_finite() && size > 0.0 && size <= MAX_GRID_SIZE {
        Ok(())
    } else {
        Err(GeoscopeError::InvalidGridSize { size })
    }
}

/// Size limits of the adaptive per-term cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheLimits {
    /// Eviction is triggered once the cache holds more entries than this
    pub upper: usize,
    /// Number of entries kept after an eviction
    pub lower: usize,
}

impl CacheLimits {
    pub fn new(upper: usize, lower: usize) -> Result<Self> {
        if upper == 0 {
            return Err(GeoscopeError::ConfigInvalid {
                key: "cache_upper".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if lower >= upper {
            return Err(GeoscopeError::ConfigInvalid {
                key: "cache_lower".to_string(),
                reason: format!("must be smaller than cache_upper ({} >= {})", lower, upper),
            });
        }
        Ok(Self { upper, lower })
    }
}

impl Default for CacheLimits {
    fn default() -> Self {
        Self { upper: DEFAULT_CACHE_UPPER, lower: DEFAULT_CACHE_LOWER }
    }
}

/// Coarse stages of a classification cascade, coarsest first.
///
/// The fine grid size of the model is the implicit last stage and is checked
/// with [`CascadeConfig::validate_fine_grid_size`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeConfig {
    grid_sizes: Vec<f64>,
    cache: CacheLimits,
}

impl CascadeConfig {
    /// Create a cascade from coarse grid sizes.
    ///
    /// Every size must be a valid grid size and at least twice the size of its successor.
    pub fn new(grid_sizes: Vec<f64>) -> Result<Self> {
        for &size in &grid_sizes {
            validate_grid_size(size)?;
        }
        for pair in grid_sizes.windows(2) {
            let (coarser, finer) = (pair[0], pair[1]);
            if coarser <= finer {
                return Err(GeoscopeError::InvalidCascade {
                    reason: format!(
                        "grid sizes must be descending, got {} followed by {}",
                        coarser, finer
                    ),
                });
            }
            if coarser < 2.0 * finer {
                return Err(GeoscopeError::InvalidCascade {
                    reason: format!(
                        "grid size {} must be at least twice the next finer size {}",
                        coarser, finer
                    ),
                });
            }
        }
        Ok(Self { grid_sizes, cache: CacheLimits::default() })
    }

    /// Use custom cache limits for the coarse stages
    pub fn with_cache_limits(mut self, cache: CacheLimits) -> Self {
        self.cache = cache;
        self
    }

    /// Check the smallest coarse size against the model's fine grid size
    pub fn validate_fine_grid_size(&self, fine_grid_size: f64) -> Result<()> {
        validate_grid_size(fine_grid_size)?;
        if let Some(&smallest) = self.grid_sizes.last() {
            if smallest < 2.0 * fine_grid_size {
                return Err(GeoscopeError::InvalidCascade {
                    reason: format!(
                        "smallest coarse grid size {} must be at least twice the fine grid size {}",
                        smallest, fine_grid_size
                    ),
                });
            }
        }
        Ok(())
    }

    pub fn grid_sizes(&self) -> &[f64] {
        &self.grid_sizes
    }

    pub fn cache_limits(&self) -> CacheLimits {
        self.cache
    }
}
