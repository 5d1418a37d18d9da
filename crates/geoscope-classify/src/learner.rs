//! Training of scope models from geotagged text.

use chrono::Utc;
use geoscope_core::models::Coordinate;
use geoscope_core::ports::Tokenizer;
use geoscope_core::processing::TermTokenizer;
use geoscope_core::{InMemoryDictionary, Result};
use geoscope_geo::geomath::center_of_minimum_distance;
use geoscope_geo::{CellId, Grid};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::model::{ScopeModelFile, MODEL_FORMAT_VERSION};

/// A text labelled with the coordinate it is about.
///
/// Serialized as `{"text": ..., "lat": ..., "lng": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingDocument {
    pub text: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

impl TrainingDocument {
    pub fn new(text: impl Into<String>, coordinate: Coordinate) -> Self {
        Self { text: text.into(), coordinate }
    }
}

/// Builds a [`ScopeModelFile`] over a fine grid
#[derive(Debug, Clone)]
pub struct ScopeLearner {
    fine_grid: Grid,
    tokenizer: TermTokenizer,
    dictionary: InMemoryDictionary,
    locations: HashMap<CellId, Vec<Coordinate>>,
}

impl ScopeLearner {
    pub fn new(fine_grid_size: f64, tokenizer: TermTokenizer) -> Result<Self> {
        Ok(Self {
            fine_grid: Grid::new(fine_grid_size)?,
            tokenizer,
            dictionary: InMemoryDictionary::new(),
            locations: HashMap::new(),
        })
    }

    /// Add one document to the model under construction.
    ///
    /// Documents without any term still contribute to their cell's
    /// representative coordinate.
    pub fn learn(&mut self, document: &TrainingDocument) {
        let cell = self.fine_grid.cell_for_coordinate(&document.coordinate);
        let terms = self.tokenizer.tokenize(&document.text);
        if !terms.is_empty() {
            self.dictionary.add_document(&terms, &cell.identifier());
        }
        self.locations.entry(cell.id()).or_default().push(document.coordinate);
    }

    pub fn num_documents(&self) -> u64 {
        self.dictionary.num_documents()
    }

    /// Finish training: compute one representative coordinate per cell
    pub fn finish(self) -> ScopeModelFile {
        let mut representatives = BTreeMap::new();
        for (id, coordinates) in &self.locations {
            if let Some(center) = center_of_minimum_distance(coordinates) {
                representatives.insert(*id, center);
            }
        }

        tracing::info!(
            fine_grid_size = self.fine_grid.grid_size(),
            documents = self.dictionary.num_documents(),
            cells = representatives.len(),
            "Finished training scope model"
        );

        ScopeModelFile {
            version: MODEL_FORMAT_VERSION,
            fine_grid_size: self.fine_grid.grid_size(),
            tokenizer: self.tokenizer,
            trained_at: Utc::now(),
            dictionary: self.dictionary,
            representatives,
        }
    }

    /// Train on a whole corpus
    pub fn train<'a, I>(mut self, documents: I) -> ScopeModelFile
    where
        I: IntoIterator<Item = &'a TrainingDocument>,
    {
        for document in documents {
            self.learn(document);
        }
        self.finish()
    }
}
