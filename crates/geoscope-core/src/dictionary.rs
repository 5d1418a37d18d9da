//! In-memory dictionary model.
//!
//! The base [`DictionaryModel`] produced by training. It stores, per term, the
//! number of documents of each category that contained the term, along with
//! per-category document and term totals.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::CategoryDistribution;
use crate::ports::DictionaryModel;

/// Term → category counts, held entirely in memory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryDictionary {
    terms: HashMap<String, CategoryDistribution>,
    document_counts: CategoryDistribution,
    term_counts: CategoryDistribution,
}

impl InMemoryDictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one document of `category` containing the given terms.
    ///
    /// Each term counts once per call; callers pass deduplicated terms.
    pub fn add_document<I, S>(&mut self, terms: I, category: &str)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.document_counts.add(category, 1);
        for term in terms {
            self.update_term(term.as_ref(), category, 1);
        }
    }

    /// Add `count` occurrences of `term` in `category`
    pub fn update_term(&mut self, term: &str, category: &str, count: u64) {
        if count == 0 {
            return;
        }
        match self.terms.get_mut(term) {
            Some(entries) => entries.add(category, count),
            None => {
                let mut entries = CategoryDistribution::new();
                entries.add(category, count);
                self.terms.insert(term.to_string(), entries);
            }
        }
        self.term_counts.add(category, count);
    }

    /// Number of distinct categories with at least one document
    pub fn num_categories(&self) -> usize {
        self.document_counts.len()
    }

    /// Total number of recorded documents
    pub fn num_documents(&self) -> u64 {
        self.document_counts.total()
    }
}

impl DictionaryModel for InMemoryDictionary {
    fn visit_entries(&self, term: &str, visit: &mut dyn FnMut(&str, u64)) {
        if let Some(entries) = self.terms.get(term) {
            for (category, count) in entries.iter() {
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
        self.terms.len()
    }
}
