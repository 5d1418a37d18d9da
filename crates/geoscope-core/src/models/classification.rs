use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A scored category in a classification result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCategory {
    pub category: String,
    pub probability: f64,
}

/// Output of a classifier: categories ordered by descending probability.
///
/// An empty classification means the classifier abstained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    ranked: Vec<ScoredCategory>,
}

impl Classification {
    /// A classification without any category
    pub fn abstain() -> Self {
        Self::default()
    }

    /// Build a classification from log-scores, normalizing them into probabilities.
    ///
    /// Ranking is by descending score, ties by ascending category name.
    pub fn from_log_scores(scores: Vec<(String, f64)>) -> Self {
        let finite: Vec<(String, f64)> =
            scores.into_iter().filter(|(_, s)| s.is_finite()).collect();
        if finite.is_empty() {
            return Self::abstain();
        }

        let max = finite.iter().map(|(_, s)| *s).fold(f64::NEG_INFINITY, f64::max);
        let norm: f64 = finite.iter().map(|(_, s)| (s - max).exp()).sum();

        let mut ranked: Vec<ScoredCategory> = finite
            .into_iter()
            .map(|(category, s)| ScoredCategory { category, probability: (s - max).exp() / norm })
            .collect();
        ranked.sort_by(compare_ranked);
        Self { ranked }
    }

    /// The top category, or `None` if the classifier abstained
    pub fn most_likely(&self) -> Option<&ScoredCategory> {
        self.ranked.first()
    }

    pub fn ranked(&self) -> &[ScoredCategory] {
        &self.ranked
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }
}

fn compare_ranked(a: &ScoredCategory, b: &ScoredCategory) -> Ordering {
    b.probability
        .partial_cmp(&a.probability)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.category.cmp(&b.category))
}
