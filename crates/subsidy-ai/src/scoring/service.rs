use std::sync::Arc;

use super::domain::{ApplicationDraft, CompanyProfile, SubsidyProgram};
use super::explain::PredictionResult;
use super::model::ModelStore;
use super::predictor::AdoptionPredictor;
use super::quality::{CompanyContext, EvaluationKind, QualityEvaluator, QualityFeedback};
use super::trainer::{train_model, TrainingDataset, TrainingError, TrainingOptions, TrainingReport};

/// Facade composing the predictor, quality evaluator, and model store.
///
/// The two scoring entry points are total: they always return a well-formed
/// payload. Only `retrain` can fail, and it runs as an explicit batch action.
pub struct ScoringService<S> {
    predictor: Arc<AdoptionPredictor>,
    evaluator: QualityEvaluator,
    store: Arc<S>,
}

impl<S> ScoringService<S>
where
    S: ModelStore + 'static,
{
    /// Wire up against a store, loading any persisted model best-effort.
    pub fn new(store: Arc<S>) -> Self {
        let predictor = Arc::new(AdoptionPredictor::from_store(store.as_ref()));
        Self {
            predictor,
            evaluator: QualityEvaluator::new(),
            store,
        }
    }

    pub fn predict(
        &self,
        draft: &ApplicationDraft,
        program: &SubsidyProgram,
        company: &CompanyProfile,
    ) -> PredictionResult {
        self.predictor.predict(draft, program, company)
    }

    pub fn evaluate_quality(
        &self,
        content: &str,
        company: &CompanyContext,
        subsidy_kind: &str,
        kind: EvaluationKind,
    ) -> QualityFeedback {
        self.evaluator
            .comprehensive_evaluation(content, company, subsidy_kind, kind)
    }

    /// Run the offline training job and hot-swap the resulting snapshot in.
    /// Predictions already in flight finish on the snapshot they started with.
    pub fn retrain(
        &self,
        dataset: &TrainingDataset,
        options: &TrainingOptions,
    ) -> Result<TrainingReport, TrainingError> {
        let report = train_model(dataset, options, self.store.as_ref())?;
        if let Some(snapshot) = self.store.load()? {
            self.predictor.install(snapshot);
        }
        Ok(report)
    }

    /// Name of the active classifier family, if a model is loaded.
    pub fn model_name(&self) -> Option<&'static str> {
        self.predictor.model_name()
    }
}
