//! Coarse-to-fine scope detection.
//!
//! The detector runs one stage per configured coarse grid size followed by a
//! final stage on the model's fine grid. The first stage classifies against
//! all cells; every later stage only sees the cells of its grid contained in
//! the cell predicted by the previous stage. If a stage cannot make a
//! prediction, detection stops there and the previous stage's cell is used.

use geoscope_core::models::{CascadeConfig, Coordinate};
use geoscope_core::ports::{Classifier, DictionaryModel};
use geoscope_core::Result;
use geoscope_geo::{Grid, GridCell};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::cache::CacheStats;
use crate::classifier::BayesClassifier;
use crate::decorators::{CoarseDictionaryDecorator, FocusDictionaryDecorator};
use crate::model::ScopeModel;

/// How far detection got
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CascadeStatus {
    /// Every stage produced a prediction
    Completed,
    /// `failed_stage` abstained; the result comes from the stage before it
    Degraded { failed_stage: usize },
    /// The first stage abstained
    Unclassified,
}

/// Prediction made by one stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StagePrediction {
    pub stage: usize,
    pub grid_size: f64,
    /// Number of cells the stage was restricted to, `None` for an unrestricted stage
    pub candidates: Option<usize>,
    pub cell: String,
    pub probability: f64,
}

/// Full result of a detection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopeDetection {
    pub coordinate: Option<Coordinate>,
    #[serde(flatten)]
    pub status: CascadeStatus,
    pub stages: Vec<StagePrediction>,
}

struct Stage {
    grid: Grid,
    dictionary: Arc<dyn DictionaryModel>,
    coarse: Option<Arc<CoarseDictionaryDecorator>>,
}

/// Cascaded detector over a [`ScopeModel`].
///
/// Immutable after construction apart from the coarse term caches, so one
/// detector can serve concurrent callers.
pub struct CascadeScopeDetector<C = BayesClassifier> {
    model: Arc<ScopeModel>,
    classifier: C,
    stages: Vec<Stage>,
}

impl<C: Classifier> CascadeScopeDetector<C> {
    /// Build the stages for `config` on top of `model`.
    ///
    /// Fails if the configured sizes do not form a valid cascade above the
    /// model's fine grid size, or if a model category is not a fine cell.
    pub fn new(model: Arc<ScopeModel>, config: &CascadeConfig, classifier: C) -> Result<Self> {
        config.validate_fine_grid_size(model.fine_grid_size())?;

        let mut stages = Vec::with_capacity(config.grid_sizes().len() + 1);
        for &grid_size in config.grid_sizes() {
            let grid = Grid::new(grid_size)?;
            let coarse = Arc::new(CoarseDictionaryDecorator::new(
                Arc::clone(model.dictionary()),
                grid,
                *model.fine_grid(),
                config.cache_limits(),
            )?);
            stages.push(Stage {
                grid,
                dictionary: Arc::clone(&coarse) as Arc<dyn DictionaryModel>,
                coarse: Some(coarse),
            });
        }
        stages.push(Stage {
            grid: *model.fine_grid(),
            dictionary: Arc::clone(model.dictionary()),
            coarse: None,
        });

        tracing::info!(
            stages = stages.len(),
            grid_sizes = ?config.grid_sizes(),
            fine_grid_size = model.fine_grid_size(),
            "Created cascade scope detector"
        );

        Ok(Self { model, classifier, stages })
    }

    /// Grid sizes of all stages, coarsest first
    pub fn stage_grid_sizes(&self) -> Vec<f64> {
        self.stages.iter().map(|s| s.grid.grid_size()).collect()
    }

    /// Coordinate the text is about, `None` if no stage could classify it
    pub fn get_scope(&self, text: &str) -> Option<Coordinate> {
        self.detect(text).coordinate
    }

    /// Run the cascade and report every stage
    pub fn detect(&self, text: &str) -> ScopeDetection {
        let terms = self.model.tokenizer().tokenize(text);
        let mut predictions = Vec::with_capacity(self.stages.len());
        let mut predicted: Option<GridCell> = None;

        for (index, stage) in self.stages.iter().enumerate() {
            let (cell, prediction) = self.run_stage(index, stage, &terms, predicted.as_ref());

            match (cell, predicted) {
                (Some(cell), _) => {
                    predictions.extend(prediction);
                    predicted = Some(cell);
                }
                (None, None) => {
                    tracing::debug!(terms = terms.len(), "First stage abstained");
                    return ScopeDetection {
                        coordinate: None,
                        status: CascadeStatus::Unclassified,
                        stages: predictions,
                    };
                }
                (None, Some(previous)) => {
                    tracing::debug!(
                        failed_stage = index,
                        grid_size = stage.grid.grid_size(),
                        fallback = %previous,
                        "Stage abstained, falling back to previous prediction"
                    );
                    return ScopeDetection {
                        coordinate: Some(self.model.representative(&previous)),
                        status: CascadeStatus::Degraded { failed_stage: index },
                        stages: predictions,
                    };
                }
            }
        }

        ScopeDetection {
            coordinate: predicted.map(|cell| self.model.representative(&cell)),
            status: CascadeStatus::Completed,
            stages: predictions,
        }
    }

    /// Classify against one stage, restricted to the cells inside `within`
    fn run_stage(
        &self,
        index: usize,
        stage: &Stage,
        terms: &[String],
        within: Option<&GridCell>,
    ) -> (Option<GridCell>, Option<StagePrediction>) {
        let (classification, candidates) = match within {
            None => (self.classifier.classify(terms, stage.dictionary.as_ref()), None),
            Some(outer) => {
                let allowed: HashSet<String> = stage
                    .grid
                    .cells_contained_in(outer)
                    .iter()
                    .map(GridCell::identifier)
                    .collect();
                let focus = FocusDictionaryDecorator::new(stage.dictionary.as_ref(), |category: &str| {
                    allowed.contains(category)
                });
                (self.classifier.classify(terms, &focus), Some(allowed.len()))
            }
        };

        let Some(top) = classification.most_likely() else {
            return (None, None);
        };
        match stage.grid.cell_for_identifier(&top.category) {
            Ok(cell) => {
                let prediction = StagePrediction {
                    stage: index,
                    grid_size: stage.grid.grid_size(),
                    candidates,
                    cell: cell.identifier(),
                    probability: top.probability,
                };
                (Some(cell), Some(prediction))
            }
            Err(e) => {
                tracing::warn!(stage = index, category = %top.category, error = %e, "Classifier returned an unknown cell");
                (None, None)
            }
        }
    }

    /// Term cache counters of the coarse stages, keyed by grid size
    pub fn cache_stats(&self) -> Vec<(f64, CacheStats)> {
        self.stages
            .iter()
            .filter_map(|stage| {
                stage.coarse.as_ref().map(|coarse| (stage.grid.grid_size(), coarse.cache_stats()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learner::{ScopeLearner, TrainingDocument};
    use geoscope_core::processing::TermTokenizer;

    fn model() -> Arc<ScopeModel> {
        let documents = vec![
            TrainingDocument::new("eiffel louvre", Coordinate::new(48.85, 2.35).unwrap()),
            TrainingDocument::new("brandenburg spree", Coordinate::new(52.52, 13.40).unwrap()),
        ];
        let file = ScopeLearner::new(1.0, TermTokenizer::default()).unwrap().train(&documents);
        Arc::new(file.into_model().unwrap())
    }

    #[test]
    fn test_stage_layout() {
        let config = CascadeConfig::new(vec![10.0, 5.0]).unwrap();
        let detector = CascadeScopeDetector::new(model(), &config, BayesClassifier::default()).unwrap();
        assert_eq!(detector.stage_grid_sizes(), vec![10.0, 5.0, 1.0]);
        assert_eq!(detector.cache_stats().len(), 2);
    }

    #[test]
    fn test_unclassified_without_evidence() {
        let config = CascadeConfig::new(vec![10.0]).unwrap();
        let detector = CascadeScopeDetector::new(model(), &config, BayesClassifier::default()).unwrap();
        let detection = detector.detect("nothing known here");
        assert_eq!(detection.status, CascadeStatus::Unclassified);
        assert!(detection.coordinate.is_none());
        assert!(detection.stages.is_empty());
    }

    #[test]
    fn test_completed_detection_reports_each_stage() {
        let config = CascadeConfig::new(vec![10.0]).unwrap();
        let detector = CascadeScopeDetector::new(model(), &config, BayesClassifier::default()).unwrap();
        let detection = detector.detect("Spree river");
        assert_eq!(detection.status, CascadeStatus::Completed);
        assert_eq!(detection.stages.len(), 2);
        assert_eq!(detection.stages[0].cell, "(19|14)");
        assert_eq!(detection.stages[0].candidates, None);
        assert_eq!(detection.stages[1].cell, "(193|142)");
        assert_eq!(detection.stages[1].candidates, Some(100));
    }

    #[test]
    fn test_empty_cascade_uses_fine_grid_only() {
        let config = CascadeConfig::new(Vec::new()).unwrap();
        let detector = CascadeScopeDetector::new(model(), &config, BayesClassifier::default()).unwrap();
        assert_eq!(detector.stage_grid_sizes(), vec![1.0]);
        let coordinate = detector.get_scope("louvre").unwrap();
        assert!((coordinate.lat() - 48.85).abs() < 1e-6);
    }

    #[test]
    fn test_detection_serializes_status_inline() {
        let config = CascadeConfig::new(vec![10.0]).unwrap();
        let detector = CascadeScopeDetector::new(model(), &config, BayesClassifier::default()).unwrap();
        let json = serde_json::to_value(detector.detect("eiffel")).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["stages"].as_array().unwrap().len(), 2);
    }
}
