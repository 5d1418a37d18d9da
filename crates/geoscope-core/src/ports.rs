//! Port trait definitions
//!
//! These traits define the seams between the cascade and its collaborators:
//! the dictionary model it queries, the classifier that scores text against a
//! dictionary, and the tokenizer that turns text into terms.

use std::collections::BTreeSet;

use crate::models::{CategoryDistribution, Classification};

/// A queryable mapping from terms to per-category occurrence counts.
///
/// Implementations must be safe to share between threads; decorators wrap
/// another `DictionaryModel` and present the same contract.
pub trait DictionaryModel: Send + Sync {
    /// Call `visit` with every `(category, count)` pair recorded for `term`.
    ///
    /// Unknown terms produce no calls.
    fn visit_entries(&self, term: &str, visit: &mut dyn FnMut(&str, u64));

    /// Call `visit` with every category visible through this model
    fn visit_categories(&self, visit: &mut dyn FnMut(&str));

    /// Number of training documents per category
    fn document_counts(&self) -> &CategoryDistribution;

    /// Number of term occurrences per category
    fn term_counts(&self) -> &CategoryDistribution;

    /// Number of distinct terms in the vocabulary
    fn num_terms(&self) -> usize;

    /// Collected distribution for `term`; empty for unknown terms
    fn category_entries(&self, term: &str) -> CategoryDistribution {
        let mut distribution = CategoryDistribution::new();
        self.visit_entries(term, &mut |category, count| distribution.add(category, count));
        distribution
    }

    /// All visible categories
    fn categories(&self) -> BTreeSet<String> {
        let mut categories = BTreeSet::new();
        self.visit_categories(&mut |category| {
            categories.insert(category.to_string());
        });
        categories
    }
}

/// Scores a tokenized document against a dictionary model
pub trait Classifier: Send + Sync {
    /// Classify the terms; an empty result means the classifier abstains
    fn classify(&self, terms: &[String], model: &dyn DictionaryModel) -> Classification;
}

/// Turns raw text into the terms used as dictionary keys
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}
