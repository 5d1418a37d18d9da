//! GeoScope Classify - Cascaded grid-cell scope detection
//!
//! This crate implements the classification side: the dictionary decorators
//! that simulate coarse models and restrict categories, the Bayes classifier,
//! the trained scope model with its persistence and learner, and the cascade
//! detector orchestrating coarse-to-fine stages.

pub mod cache;
pub mod cascade;
pub mod classifier;
pub mod decorators;
pub mod learner;
pub mod model;

pub use cache::{AdaptiveCache, CacheStats};
pub use cascade::{CascadeScopeDetector, CascadeStatus, ScopeDetection, StagePrediction};
pub use classifier::BayesClassifier;
pub use decorators::{CoarseDictionaryDecorator, FocusDictionaryDecorator};
pub use learner::{ScopeLearner, TrainingDocument};
pub use model::{ScopeModel, ScopeModelFile};
