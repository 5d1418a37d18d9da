use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Occurrence counts per category.
///
/// Categories are kept in lexicographic order, which makes iteration and
/// [`CategoryDistribution::most_likely`] deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryDistribution {
    counts: BTreeMap<String, u64>,
}

impl CategoryDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences to a category
    pub fn add(&mut self, category: impl Into<String>, count: u64) {
        if count == 0 {
            return;
        }
        *self.counts.entry(category.into()).or_insert(0) += count;
    }

    /// Count for a category, zero when absent
    pub fn count(&self, category: &str) -> u64 {
        self.counts.get(category).copied().unwrap_or(0)
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of categories with a non-zero count
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Category with the highest count.
    ///
    /// Ties go to the lexicographically smallest category name.
    pub fn most_likely(&self) -> Option<(&str, u64)> {
        let mut best: Option<(&str, u64)> = None;
        for (category, &count) in &self.counts {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((category.as_str(), count)),
            }
        }
        best
    }

    /// Iterate over `(category, count)` pairs in category order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(c, &n)| (c.as_str(), n))
    }

    /// Iterate over category names
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Keep only the categories accepted by the predicate
    pub fn filtered<P>(&self, allowed: P) -> Self
    where
        P: Fn(&str) -> bool,
    {
        Self {
            counts: self
                .counts
                .iter()
                .filter(|(c, _)| allowed(c))
                .map(|(c, &n)| (c.clone(), n))
                .collect(),
        }
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for CategoryDistribution {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut distribution = CategoryDistribution::new();
        for (category, count) in iter {
            distribution.add(category, count);
        }
        distribution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_sums_counts() {
        let mut d = CategoryDistribution::new();
        d.add("(1|2)", 3);
        d.add("(1|2)", 4);
        d.add("(5|5)", 1);
        assert_eq!(d.count("(1|2)"), 7);
        assert_eq!(d.count("(9|9)"), 0);
        assert_eq!(d.total(), 8);
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn test_zero_counts_are_not_stored() {
        let mut d = CategoryDistribution::new();
        d.add("(0|0)", 0);
        assert!(d.is_empty());
        assert_eq!(d.total(), 0);
        assert_eq!(d.most_likely(), None);
    }

    #[test]
    fn test_most_likely_tie_break() {
        let d: CategoryDistribution = vec![("(3|1)", 5), ("(1|1)", 5), ("(2|1)", 2)].into_iter().collect();
        assert_eq!(d.most_likely(), Some(("(1|1)", 5)));
    }

    #[test]
    fn test_filtered() {
        let d: CategoryDistribution = vec![("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        let f = d.filtered(|c| c != "b");
        assert_eq!(f.categories().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(f.total(), 4);
    }

    #[test]
    fn test_serializes_as_map() {
        let d: CategoryDistribution = vec![("(1|2)", 3)].into_iter().collect();
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, r#"{"(1|2)":3}"#);
    }
}
