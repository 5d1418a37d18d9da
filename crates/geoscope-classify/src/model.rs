//! Trained scope model and its on-disk form.

use chrono::{DateTime, Utc};
use geoscope_core::models::Coordinate;
use geoscope_core::ports::{DictionaryModel, Tokenizer};
use geoscope_core::processing::TermTokenizer;
use geoscope_core::{GeoscopeError, InMemoryDictionary, Result};
use geoscope_geo::{CellId, Grid, GridCell};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Current version of the model file format
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// A dictionary over fine-grid cells together with a representative
/// coordinate per trained cell.
pub struct ScopeModel {
    fine_grid: Grid,
    dictionary: Arc<dyn DictionaryModel>,
    representatives: HashMap<CellId, Coordinate>,
    tokenizer: Arc<dyn Tokenizer>,
}

impl ScopeModel {
    pub fn new(
        fine_grid: Grid,
        dictionary: Arc<dyn DictionaryModel>,
        representatives: HashMap<CellId, Coordinate>,
        tokenizer: Arc<dyn Tokenizer>,
    ) -> Self {
        Self { fine_grid, dictionary, representatives, tokenizer }
    }

    pub fn fine_grid(&self) -> &Grid {
        &self.fine_grid
    }

    pub fn fine_grid_size(&self) -> f64 {
        self.fine_grid.grid_size()
    }

    pub fn dictionary(&self) -> &Arc<dyn DictionaryModel> {
        &self.dictionary
    }

    pub fn tokenizer(&self) -> &dyn Tokenizer {
        self.tokenizer.as_ref()
    }

    /// Coordinate standing for `cell`.
    ///
    /// Cells of the fine grid use their trained representative when one
    /// exists. Every other cell, including cells of coarser grids whose
    /// identifiers may collide with fine ones, falls back to its center.
    pub fn representative(&self, cell: &GridCell) -> Coordinate {
        if cell.grid_size() == self.fine_grid.grid_size() {
            if let Some(coordinate) = self.representatives.get(&cell.id()) {
                return *coordinate;
            }
        }
        cell.center()
    }
}

/// Serialized model: dictionary, representatives and training metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeModelFile {
    pub version: u32,
    pub fine_grid_size: f64,
    pub tokenizer: TermTokenizer,
    pub trained_at: DateTime<Utc>,
    pub dictionary: InMemoryDictionary,
    pub representatives: BTreeMap<CellId, Coordinate>,
}

impl ScopeModelFile {
    /// Write the model as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string(self)?;
        fs::write(path, content)?;
        tracing::info!(
            path = %path.display(),
            categories = self.dictionary.num_categories(),
            terms = self.dictionary.num_terms(),
            "Saved scope model"
        );
        Ok(())
    }

    /// Read a model file, checking its format version before decoding the rest
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GeoscopeError::ModelNotFound { path: path.to_path_buf() });
        }

        let content = fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| GeoscopeError::ModelCorrupted { reason: e.to_string() })?;

        let version = value
            .get("version")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| GeoscopeError::ModelCorrupted {
                reason: "missing format version".to_string(),
            })?;
        if version != u64::from(MODEL_FORMAT_VERSION) {
            return Err(GeoscopeError::ModelVersion {
                found: u32::try_from(version).unwrap_or(u32::MAX),
                expected: MODEL_FORMAT_VERSION,
            });
        }

        let file: ScopeModelFile = serde_json::from_value(value)
            .map_err(|e| GeoscopeError::ModelCorrupted { reason: e.to_string() })?;
        tracing::debug!(path = %path.display(), trained_at = %file.trained_at, "Loaded scope model");
        Ok(file)
    }

    /// Validate categories and representatives against the fine grid and
    /// build a [`ScopeModel`]
    pub fn into_model(self) -> Result<ScopeModel> {
        let fine_grid = Grid::new(self.fine_grid_size)?;

        for category in self.dictionary.categories() {
            fine_grid.cell_for_identifier(&category).map_err(|e| GeoscopeError::ModelCorrupted {
                reason: format!("category {}: {}", category, e),
            })?;
        }
        for id in self.representatives.keys() {
            fine_grid.cell(*id).map_err(|e| GeoscopeError::ModelCorrupted {
                reason: format!("representative {}: {}", id, e),
            })?;
        }

        Ok(ScopeModel::new(
            fine_grid,
            Arc::new(self.dictionary),
            self.representatives.into_iter().collect(),
            Arc::new(self.tokenizer),
        ))
    }
}
