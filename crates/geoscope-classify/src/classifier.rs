//! Multinomial naive Bayes over dictionary counts.

use geoscope_core::ports::{Classifier, DictionaryModel};
use geoscope_core::models::Classification;
use geoscope_core::{GeoscopeError, Result};
use std::collections::BTreeMap;

/// Naive Bayes classifier with additive smoothing.
///
/// Only categories with at least one occurrence of a document term are
/// scored; when no term has evidence in any visible category the classifier
/// abstains. Terms unknown to every visible category are ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BayesClassifier {
    alpha: f64,
}

impl Default for BayesClassifier {
    fn default() -> Self {
        Self { alpha: 1.0 }
    }
}

impl BayesClassifier {
    /// Create a classifier with smoothing constant `alpha` (> 0)
    pub fn new(alpha: f64) -> Result<Self> {
        if !alpha.is_finite() || alpha <= 0.0 {
            return Err(GeoscopeError::ConfigInvalid {
                key: "alpha".to_string(),
                reason: format!("smoothing must be positive, got {}", alpha),
            });
        }
        Ok(Self { alpha })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Classifier for BayesClassifier {
    fn classify(&self, terms: &[String], model: &dyn DictionaryModel) -> Classification {
        // Per category: sum over terms of ln(n + alpha) - ln(alpha)
        let mut evidence: BTreeMap<String, f64> = BTreeMap::new();
        let mut known_terms = 0usize;
        let ln_alpha = self.alpha.ln();

        for term in terms {
            let mut seen = false;
            model.visit_entries(term, &mut |category: &str, count: u64| {
                if count == 0 {
                    return;
                }
                seen = true;
                let gain = (count as f64 + self.alpha).ln() - ln_alpha;
                match evidence.get_mut(category) {
                    Some(total) => *total += gain,
                    None => {
                        evidence.insert(category.to_string(), gain);
                    }
                }
            });
            if seen {
                known_terms += 1;
            }
        }

        if evidence.is_empty() {
            return Classification::abstain();
        }

        let vocabulary = model.num_terms() as f64;
        let documents = model.document_counts();
        let occurrences = model.term_counts();
        let n = known_terms as f64;

        let scores = evidence
            .into_iter()
            .map(|(category, gain)| {
                let prior = (documents.count(&category) as f64 + self.alpha).ln();
                let denominator =
                    (occurrences.count(&category) as f64 + self.alpha * vocabulary).ln();
                let score = prior + gain + n * (ln_alpha - denominator);
                (category, score)
            })
            .collect();

        Classification::from_log_scores(scores)
    }
}
