//! Adoption prediction and quality scoring pipeline.
//!
//! The pipeline is pure CPU-bound synchronous code: no blocking I/O on the
//! scoring paths and no shared mutable state beyond the predictor's model
//! handle, which is written only by training runs. Calls are independent and
//! safe to issue concurrently.

pub mod domain;
mod explain;
pub(crate) mod features;
pub mod model;
pub mod predictor;
pub mod quality;
pub mod router;
pub mod service;
pub mod trainer;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationDraft, ApplicationFeatures, CompanyProfile, SubsidyProgram, FEATURE_DIMENSIONS,
    FEATURE_NAMES,
};
pub use explain::PredictionResult;
pub use features::FeatureExtractor;
pub use model::{FsModelStore, ModelSnapshot, ModelStore, ModelStoreError, TrainedClassifier};
pub use predictor::AdoptionPredictor;
pub use quality::{
    CompanyContext, EvaluationKind, QualityEvaluator, QualityFeedback, QualityGrade,
    QualityMetrics,
};
pub use router::{scoring_router, QualityRequest, ScoreRequest, ScoreResponse};
pub use service::ScoringService;
pub use trainer::{
    train_model, TrainingDataset, TrainingError, TrainingExample, TrainingOptions, TrainingReport,
};
