use std::sync::Arc;

use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationDraft, CompanyProfile, SubsidyProgram};
use super::explain::PredictionResult;
use super::model::ModelStore;
use super::quality::{CompanyContext, EvaluationKind, QualityFeedback};
use super::service::ScoringService;

/// Router builder exposing the two scoring endpoints. Both are total
/// functions, so the handlers always answer 200 with a well-formed payload.
pub fn scoring_router<S>(service: Arc<ScoringService<S>>) -> Router
where
    S: ModelStore + 'static,
{
    Router::new()
        .route("/api/v1/applications/score", post(score_handler::<S>))
        .route("/api/v1/applications/quality", post(quality_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScoreRequest {
    pub application: ApplicationDraft,
    pub program: SubsidyProgram,
    pub company: CompanyProfile,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    /// Classifier family that produced the probability, or "rule_based".
    pub model: &'static str,
    #[serde(flatten)]
    pub prediction: PredictionResult,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QualityRequest {
    pub content: String,
    pub company: CompanyContext,
    pub subsidy_kind: String,
    pub kind: EvaluationKind,
}

pub(crate) async fn score_handler<S>(
    State(service): State<Arc<ScoringService<S>>>,
    Json(request): Json<ScoreRequest>,
) -> Json<ScoreResponse>
where
    S: ModelStore + 'static,
{
    let prediction = service.predict(&request.application, &request.program, &request.company);
    Json(ScoreResponse {
        model: service.model_name().unwrap_or("rule_based"),
        prediction,
    })
}

pub(crate) async fn quality_handler<S>(
    State(service): State<Arc<ScoringService<S>>>,
    Json(request): Json<QualityRequest>,
) -> Json<QualityFeedback>
where
    S: ModelStore + 'static,
{
    let feedback = service.evaluate_quality(
        &request.content,
        &request.company,
        &request.subsidy_kind,
        request.kind,
    );
    Json(feedback)
}
