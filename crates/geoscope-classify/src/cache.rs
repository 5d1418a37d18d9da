//! Size-bounded term cache with an adaptive admission threshold.
//!
//! Entries are weighted by the number of categories in their distribution.
//! When an insertion pushes the cache above its upper limit, only the
//! `lower` heaviest entries survive and the admission threshold rises to the
//! lightest survivor's weight; lighter distributions are rejected from then on
//! until [`AdaptiveCache::lower_admission_threshold`] is called.

use geoscope_core::models::{CacheLimits, CategoryDistribution};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Result of offering an entry to the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Weight below the admission threshold, not stored
    Rejected,
    /// Stored without eviction
    Inserted,
    /// Stored, then the cache was shrunk; holds the number of removed entries
    Evicted(usize),
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub admission_threshold: usize,
}

#[derive(Debug)]
pub struct AdaptiveCache {
    entries: HashMap<String, Arc<CategoryDistribution>>,
    limits: CacheLimits,
    admission_threshold: usize,
}

impl AdaptiveCache {
    pub fn new(limits: CacheLimits) -> Self {
        Self { entries: HashMap::new(), limits, admission_threshold: 0 }
    }

    pub fn get(&self, term: &str) -> Option<Arc<CategoryDistribution>> {
        self.entries.get(term).cloned()
    }

    /// Offer a distribution for caching
    pub fn insert(&mut self, term: &str, distribution: Arc<CategoryDistribution>) -> Admission {
        if distribution.len() < self.admission_threshold {
            return Admission::Rejected;
        }

        self.entries.insert(term.to_string(), distribution);
        if self.entries.len() > self.limits.upper {
            Admission::Evicted(self.evict())
        } else {
            Admission::Inserted
        }
    }

    /// Shrink to `limits.lower` entries, keeping the distributions with the most categories
    fn evict(&mut self) -> usize {
        let before = self.entries.len();

        let mut ranked: Vec<(String, Arc<CategoryDistribution>)> = self.entries.drain().collect();
        ranked.sort_by(|(term_a, a), (term_b, b)| {
            b.len().cmp(&a.len()).then_with(|| term_a.cmp(term_b))
        });
        ranked.truncate(self.limits.lower);

        if let Some((_, smallest)) = ranked.last() {
            self.admission_threshold = smallest.len();
        }
        self.entries = ranked.into_iter().collect();

        before - self.entries.len()
    }

    /// Minimum number of categories a distribution needs to be admitted
    pub fn admission_threshold(&self) -> usize {
        self.admission_threshold
    }

    /// Lower the admission threshold; higher values are ignored
    pub fn lower_admission_threshold(&mut self, threshold: usize) {
        self.admission_threshold = self.admission_threshold.min(threshold);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Distribution with `n` distinct categories
    fn dist(n: usize) -> Arc<CategoryDistribution> {
        Arc::new((0..n).map(|i| (format!("({}|0)", i), 1)).collect())
    }

    #[test]
    fn test_insert_and_get() {
        let mut cache = AdaptiveCache::new(CacheLimits::new(4, 2).unwrap());
        assert_eq!(cache.insert("paris", dist(3)), Admission::Inserted);
        assert_eq!(cache.get("paris").unwrap().len(), 3);
        assert!(cache.get("berlin").is_none());
    }

    #[test]
    fn test_eviction_keeps_largest_distributions() {
        let mut cache = AdaptiveCache::new(CacheLimits::new(4, 2).unwrap());
        cache.insert("a", dist(1));
        cache.insert("b", dist(5));
        cache.insert("c", dist(2));
        cache.insert("d", dist(4));
        assert_eq!(cache.len(), 4);

        // Fifth entry crosses the upper limit
        assert_eq!(cache.insert("e", dist(3)), Admission::Evicted(3));
        assert_eq!(cache.len(), 2);
        assert!(cache.get("b").is_some());
        assert!(cache.get("d").is_some());
        assert!(cache.get("e").is_none());
        assert_eq!(cache.admission_threshold(), 4);
    }

    #[test]
    fn test_threshold_rejects_small_distributions() {
        let mut cache = AdaptiveCache::new(CacheLimits::new(2, 1).unwrap());
        cache.insert("a", dist(3));
        cache.insert("b", dist(6));
        cache.insert("c", dist(2));
        assert_eq!(cache.admission_threshold(), 6);

        assert_eq!(cache.insert("small", dist(5)), Admission::Rejected);
        assert!(cache.get("small").is_none());
        assert_eq!(cache.insert("large", dist(6)), Admission::Inserted);
    }

    #[test]
    fn test_threshold_is_not_lowered_automatically() {
        let mut cache = AdaptiveCache::new(CacheLimits::new(2, 1).unwrap());
        cache.insert("a", dist(3));
        cache.insert("b", dist(3));
        cache.insert("c", dist(3));
        assert_eq!(cache.admission_threshold(), 3);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.insert("tiny", dist(1)), Admission::Rejected);

        cache.lower_admission_threshold(1);
        assert_eq!(cache.insert("tiny", dist(1)), Admission::Inserted);
    }

    #[test]
    fn test_lower_admission_threshold_never_raises() {
        let mut cache = AdaptiveCache::new(CacheLimits::new(2, 1).unwrap());
        cache.lower_admission_threshold(10);
        assert_eq!(cache.admission_threshold(), 0);
    }

    #[test]
    fn test_eviction_tie_break_is_deterministic() {
        let mut cache = AdaptiveCache::new(CacheLimits::new(2, 1).unwrap());
        cache.insert("zulu", dist(2));
        cache.insert("alpha", dist(2));
        cache.insert("mike", dist(2));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("alpha").is_some());
    }
}
