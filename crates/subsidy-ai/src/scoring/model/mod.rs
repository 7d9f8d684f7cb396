//! Trained model artifacts: the tree ensembles, the feature scaler, and the
//! store they persist through.

pub mod boosting;
pub mod forest;
pub mod scaler;
pub mod store;
mod tree;

pub use boosting::{BoostingParams, GradientBoostingClassifier};
pub use forest::{ForestParams, RandomForestClassifier};
pub use scaler::StandardScaler;
pub use store::{FsModelStore, ModelStore, ModelStoreError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Either candidate ensemble, behind one dispatch point so the predictor does
/// not care which family won model selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum TrainedClassifier {
    RandomForest(RandomForestClassifier),
    GradientBoosting(GradientBoostingClassifier),
}

impl TrainedClassifier {
    /// Probability of the positive (adopted) class.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        match self {
            TrainedClassifier::RandomForest(model) => model.predict_proba(row),
            TrainedClassifier::GradientBoosting(model) => model.predict_proba(row),
        }
    }

    pub fn feature_importances(&self) -> Vec<f64> {
        match self {
            TrainedClassifier::RandomForest(model) => model.feature_importances(),
            TrainedClassifier::GradientBoosting(model) => model.feature_importances(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TrainedClassifier::RandomForest(_) => "random_forest",
            TrainedClassifier::GradientBoosting(_) => "gradient_boosting",
        }
    }
}

/// Immutable pairing of classifier and scaler produced by one training run.
///
/// Predictions read the snapshot through a shared handle and a retrain
/// replaces the whole snapshot in a single swap, so an in-flight prediction
/// never observes a classifier from one run with a scaler from another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub classifier: TrainedClassifier,
    pub scaler: StandardScaler,
    pub trained_at: DateTime<Utc>,
}
