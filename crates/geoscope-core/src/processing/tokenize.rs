use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{GeoscopeError, Result};
use crate::ports::Tokenizer;

/// Largest supported word n-gram length
pub const MAX_NGRAM_LIMIT: usize = 5;

/// Configuration for term extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermTokenizer {
    /// Longest word n-gram emitted as a term
    pub max_ngram: usize,
    /// Words shorter than this (in characters) are dropped
    pub min_word_length: usize,
}

impl Default for TermTokenizer {
    fn default() -> Self {
        Self { max_ngram: 1, min_word_length: 2 }
    }
}

impl TermTokenizer {
    /// Create a tokenizer emitting word n-grams of length 1..=max_ngram
    pub fn new(max_ngram: usize, min_word_length: usize) -> Result<Self> {
        if max_ngram == 0 || max_ngram > MAX_NGRAM_LIMIT {
            return Err(GeoscopeError::ConfigInvalid {
                key: "max_ngram".to_string(),
                reason: format!(
                    "max_ngram ({}) must be between 1 and {}",
                    max_ngram, MAX_NGRAM_LIMIT
                ),
            });
        }
        Ok(Self { max_ngram, min_word_length })
    }

    /// Split text into lowercase alphanumeric words
    fn words<'a>(&self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        let min_len = self.min_word_length;
        text.split(|c: char| !c.is_alphanumeric())
            .filter(move |w| w.chars().count() >= min_len)
            .map(|w| w.to_lowercase())
    }
}

impl Tokenizer for TermTokenizer {
    /// Distinct terms of the text, in lexicographic order
    fn tokenize(&self, text: &str) -> Vec<String> {
        let words: Vec<String> = self.words(text).collect();
        let mut terms = BTreeSet::new();

        for n in 1..=self.max_ngram {
            for window in words.windows(n) {
                terms.insert(window.join(" "));
            }
        }

        terms.into_iter().collect()
    }
}
