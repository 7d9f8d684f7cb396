use std::sync::{Arc, RwLock};

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use super::domain::{ApplicationDraft, ApplicationFeatures, CompanyProfile, SubsidyProgram};
use super::explain::{
    benchmark_comparison, improvement_suggestions, key_factors, prediction_explanation,
    risk_factors, round3, score_breakdown, PredictionResult,
};
use super::features::FeatureExtractor;
use super::model::{ModelSnapshot, ModelStore};

/// Fallback weights over the ten scored factors, in `scored_factors` order.
/// They sum to 1.0.
const FALLBACK_WEIGHTS: [f64; 10] = [
    0.15, // innovation_score
    0.15, // market_potential
    0.15, // feasibility_score
    0.10, // budget_reasonableness
    0.10, // company_track_record
    0.10, // industry_alignment
    0.10, // technology_readiness
    0.08, // team_capability
    0.05, // risk_assessment
    0.02, // competitive_advantage
];

/// Adoption probability estimator.
///
/// Holds the current trained snapshot behind a read-write handle: prediction
/// paths clone the `Arc` once and work on an immutable snapshot, while a
/// retrain installs its replacement in a single swap. With no snapshot loaded
/// every call takes the deterministic rule-based path.
pub struct AdoptionPredictor {
    extractor: FeatureExtractor,
    snapshot: RwLock<Option<Arc<ModelSnapshot>>>,
}

impl AdoptionPredictor {
    /// Predictor with no trained model; every prediction is rule-based.
    pub fn without_model() -> Self {
        Self {
            extractor: FeatureExtractor::new(),
            snapshot: RwLock::new(None),
        }
    }

    /// Best-effort load from the store. Missing artifacts are the normal
    /// fresh-deployment state and only downgrade to the fallback path.
    pub fn from_store(store: &dyn ModelStore) -> Self {
        let predictor = Self::without_model();
        match store.load() {
            Ok(Some(snapshot)) => {
                info!(model = snapshot.classifier.name(), "loaded adoption model artifacts");
                predictor.install(snapshot);
            }
            Ok(None) => {
                info!("no trained adoption model found; predictions use the rule-based fallback");
            }
            Err(err) => {
                warn!(error = %err, "could not read adoption model artifacts; predictions use the rule-based fallback");
            }
        }
        predictor
    }

    /// Replace the active snapshot. In-flight predictions keep the snapshot
    /// they already cloned.
    pub fn install(&self, snapshot: ModelSnapshot) {
        let mut guard = self.snapshot.write().expect("model handle poisoned");
        *guard = Some(Arc::new(snapshot));
    }

    pub fn model_name(&self) -> Option<&'static str> {
        self.current().map(|snapshot| snapshot.classifier.name())
    }

    fn current(&self) -> Option<Arc<ModelSnapshot>> {
        self.snapshot.read().expect("model handle poisoned").clone()
    }

    /// Score one application. Total function: the worst outcome is a
    /// simplified fallback payload, never an error.
    pub fn predict(
        &self,
        draft: &ApplicationDraft,
        program: &SubsidyProgram,
        company: &CompanyProfile,
    ) -> PredictionResult {
        self.predict_as_of(draft, program, company, Utc::now().date_naive())
    }

    /// As `predict`, with an explicit reference date for the years-in-business
    /// features so batch jobs and tests are reproducible.
    pub fn predict_as_of(
        &self,
        draft: &ApplicationDraft,
        program: &SubsidyProgram,
        company: &CompanyProfile,
        today: NaiveDate,
    ) -> PredictionResult {
        let features = self.extractor.extract(draft, program, company, today);

        let probability = match self.current() {
            Some(snapshot) => {
                let vector = snapshot.scaler.transform(&features.to_vector());
                snapshot.classifier.predict_proba(&vector)
            }
            None => fallback_probability(&features),
        };

        if !probability.is_finite() {
            warn!("adoption model produced a non-finite probability; returning simplified result");
            return PredictionResult::degraded(&features);
        }

        assemble(probability.clamp(0.0, 1.0), &features)
    }
}

/// Deterministic weighted sum over the ten scored factors, clamped away from
/// absolute verdicts.
pub(crate) fn fallback_probability(features: &ApplicationFeatures) -> f64 {
    let weighted: f64 = features
        .scored_factors()
        .iter()
        .zip(FALLBACK_WEIGHTS.iter())
        .map(|((_, score), weight)| score * weight)
        .sum();
    weighted.clamp(0.05, 0.95)
}

/// Confidence blends input completeness with distance from the coin flip.
fn confidence_score(probability: f64, features: &ApplicationFeatures) -> f64 {
    let checks = [
        features.text_length > 100.0,
        features.keyword_density > 0.1,
        features.innovation_score > 0.3,
        features.market_potential > 0.3,
        features.feasibility_score > 0.3,
    ];
    let completeness = checks.iter().filter(|&&passed| passed).count() as f64 / checks.len() as f64;
    let certainty = (probability - 0.5).abs() * 2.0;

    ((completeness + certainty) / 2.0).clamp(0.3, 0.95)
}

fn assemble(probability: f64, features: &ApplicationFeatures) -> PredictionResult {
    let key_factors = key_factors(features);
    let prediction_explanation = prediction_explanation(probability, features, &key_factors);

    PredictionResult {
        adoption_probability: round3(probability),
        confidence_score: confidence_score(probability, features),
        score_breakdown: score_breakdown(features),
        key_factors,
        improvement_suggestions: improvement_suggestions(features),
        risk_factors: risk_factors(features),
        benchmark_comparison: benchmark_comparison(features),
        prediction_explanation,
    }
}
