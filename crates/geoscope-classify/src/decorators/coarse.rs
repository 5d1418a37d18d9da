//! Coarse view over a fine-grid dictionary.
//!
//! Every fine category is mapped to the coarse cell containing the fine cell's
//! center. Aggregated term distributions are kept in an [`AdaptiveCache`];
//! category identifier mappings are memoized without bound.

use geoscope_core::models::{CacheLimits, CategoryDistribution};
use geoscope_core::ports::DictionaryModel;
use geoscope_core::Result;
use geoscope_geo::Grid;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::cache::{Admission, AdaptiveCache, CacheStats};

pub struct CoarseDictionaryDecorator {
    decorated: Arc<dyn DictionaryModel>,
    coarse_grid: Grid,
    fine_grid: Grid,
    /// Fine identifier → coarse identifier, `None` for unparseable identifiers
    id_map: RwLock<HashMap<String, Option<String>>>,
    term_cache: RwLock<AdaptiveCache>,
    document_counts: CategoryDistribution,
    term_counts: CategoryDistribution,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

/// Coarse identifier of the cell containing the center of a fine cell
fn map_identifier(coarse_grid: &Grid, fine_grid: &Grid, fine_identifier: &str) -> Result<String> {
    let fine_cell = fine_grid.cell_for_identifier(fine_identifier)?;
    Ok(coarse_grid.cell_for_coordinate(&fine_cell.center()).identifier())
}

impl CoarseDictionaryDecorator {
    /// Wrap `decorated`, whose categories are cells of `fine_grid`.
    ///
    /// Aggregate counts are remapped eagerly; a category that is not a valid
    /// `fine_grid` identifier is an error here.
    pub fn new(
        decorated: Arc<dyn DictionaryModel>,
        coarse_grid: Grid,
        fine_grid: Grid,
        cache_limits: CacheLimits,
    ) -> Result<Self> {
        let mut id_map: HashMap<String, Option<String>> = HashMap::new();

        let mut categories = Vec::new();
        decorated.visit_categories(&mut |category: &str| categories.push(category.to_string()));
        for category in categories {
            let coarse = map_identifier(&coarse_grid, &fine_grid, &category)?;
            id_map.insert(category, Some(coarse));
        }

        let mut remap = |counts: &CategoryDistribution| -> Result<CategoryDistribution> {
            let mut remapped = CategoryDistribution::new();
            for (category, count) in counts.iter() {
                let coarse = match id_map.get(category) {
                    Some(Some(coarse)) => coarse.clone(),
                    _ => {
                        let coarse = map_identifier(&coarse_grid, &fine_grid, category)?;
                        id_map.insert(category.to_string(), Some(coarse.clone()));
                        coarse
                    }
                };
                remapped.add(coarse, count);
            }
            Ok(remapped)
        };
        let document_counts = remap(decorated.document_counts())?;
        let term_counts = remap(decorated.term_counts())?;

        tracing::debug!(
            coarse_grid_size = coarse_grid.grid_size(),
            fine_grid_size = fine_grid.grid_size(),
            fine_categories = id_map.len(),
            coarse_categories = document_counts.len(),
            "Created coarse dictionary view"
        );

        Ok(Self {
            decorated,
            coarse_grid,
            fine_grid,
            id_map: RwLock::new(id_map),
            term_cache: RwLock::new(AdaptiveCache::new(cache_limits)),
            document_counts,
            term_counts,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        })
    }

    pub fn coarse_grid(&self) -> &Grid {
        &self.coarse_grid
    }

    pub fn fine_grid(&self) -> &Grid {
        &self.fine_grid
    }

    /// Coarse identifier for a fine category, memoized
    fn coarse_identifier(&self, fine_identifier: &str) -> Option<String> {
        if let Some(mapped) = self
            .id_map
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(fine_identifier)
        {
            return mapped.clone();
        }

        let mapped = match map_identifier(&self.coarse_grid, &self.fine_grid, fine_identifier) {
            Ok(coarse) => Some(coarse),
            Err(e) => {
                tracing::warn!(category = fine_identifier, error = %e, "Skipping malformed category");
                None
            }
        };
        self.id_map
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(fine_identifier.to_string(), mapped.clone());
        mapped
    }

    /// Coarse distribution for a term; `None` when the term is unknown
    fn aggregate(&self, term: &str) -> Option<Arc<CategoryDistribution>> {
        if let Some(hit) = self.term_cache.read().unwrap_or_else(PoisonError::into_inner).get(term) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Some(hit);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let mut aggregated = CategoryDistribution::new();
        let mut known = false;
        self.decorated.visit_entries(term, &mut |category: &str, count: u64| {
            known = true;
            if let Some(coarse) = self.coarse_identifier(category) {
                aggregated.add(coarse, count);
            }
        });
        if !known || aggregated.is_empty() {
            return None;
        }

        let aggregated = Arc::new(aggregated);
        let admission = self
            .term_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(term, Arc::clone(&aggregated));
        if let Admission::Evicted(removed) = admission {
            self.evictions.fetch_add(removed as u64, Ordering::Relaxed);
            tracing::debug!(
                coarse_grid_size = self.coarse_grid.grid_size(),
                removed,
                "Shrunk coarse term cache"
            );
        }
        Some(aggregated)
    }

    /// Counters of the term cache
    pub fn cache_stats(&self) -> CacheStats {
        let cache = self.term_cache.read().unwrap_or_else(PoisonError::into_inner);
        CacheStats {
            entries: cache.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            admission_threshold: cache.admission_threshold(),
        }
    }

    /// Lower the cache admission threshold, letting smaller distributions in again
    pub fn lower_admission_threshold(&self, threshold: usize) {
        self.term_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .lower_admission_threshold(threshold);
    }
}

impl DictionaryModel for CoarseDictionaryDecorator {
    fn visit_entries(&self, term: &str, visit: &mut dyn FnMut(&str, u64)) {
        if let Some(aggregated) = self.aggregate(term) {
            for (category, count) in aggregated.iter() {
                visit(category, count);
            }
        }
    }

    fn visit_categories(&self, visit: &mut dyn FnMut(&str)) {
        for category in self.document_counts.categories() {
            visit(category);
        }
    }

    fn document_counts(&self) -> &CategoryDistribution {
        &self.document_counts
    }

    fn term_counts(&self) -> &CategoryDistribution {
        &self.term_counts
    }

    fn num_terms(&self) -> usize {
        self.decorated.num_terms()
    }

    fn category_entries(&self, term: &str) -> CategoryDistribution {
        self.aggregate(term).map(|a| (*a).clone()).unwrap_or_default()
    }
}
