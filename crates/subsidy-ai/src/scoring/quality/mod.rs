//! Heuristic quality scoring for generated application text.
//!
//! Six keyword-driven sub-scores aggregate into a 0-100 composite. Each
//! sub-score is a pure function of the text and context, so calls are safe to
//! run concurrently and two evaluations of the same input always agree.

mod heuristics;

use serde::{Deserialize, Serialize};

/// Aggregation weights, in `QualityMetrics` field order. They sum to 1.0.
const QUALITY_WEIGHTS: [f64; 6] = [0.25, 0.20, 0.20, 0.15, 0.10, 0.10];

/// Company context the text is scored against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyContext {
    pub name: String,
    pub industry: String,
    pub strengths: Vec<String>,
}

/// What the evaluated text claims to be. Both kinds currently share one
/// rubric; the discriminator is kept so feedback payloads stay explicit about
/// what was scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationKind {
    #[default]
    BusinessPlan,
    ApplicationSection,
}

/// Six dimension scores in [0, 100] plus the derived composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub relevance: f64,
    pub coherence: f64,
    pub factuality: f64,
    pub completeness: f64,
    pub clarity: f64,
    pub innovation: f64,
    /// Fixed-weight dot product of the six dimensions.
    pub overall_score: f64,
    /// Inverse of sub-score spread, floored at 50 and capped at 100: widely
    /// disagreeing dimensions mean a less trustworthy composite.
    pub confidence_level: f64,
}

impl QualityMetrics {
    fn dimensions(&self) -> [f64; 6] {
        [
            self.relevance,
            self.coherence,
            self.factuality,
            self.completeness,
            self.clarity,
            self.innovation,
        ]
    }
}

/// Letter grade bands used in user-facing feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityGrade {
    A,
    B,
    C,
    D,
    F,
}

impl QualityGrade {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::A
        } else if score >= 80.0 {
            Self::B
        } else if score >= 70.0 {
            Self::C
        } else if score >= 60.0 {
            Self::D
        } else {
            Self::F
        }
    }
}

/// Full feedback payload wrapping the metrics with dimension-level highlights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityFeedback {
    pub kind: EvaluationKind,
    pub metrics: QualityMetrics,
    /// Dimensions scoring 80 or above.
    pub strengths: Vec<String>,
    /// Dimensions scoring below 70.
    pub weaknesses: Vec<String>,
    pub grade: QualityGrade,
}

const DIMENSION_LABELS: [&str; 6] = [
    "関連性",
    "論理構成",
    "事実性",
    "網羅性",
    "明瞭さ",
    "革新性",
];

/// Stateless evaluator; shared freely across request handlers.
#[derive(Debug, Default, Clone, Copy)]
pub struct QualityEvaluator;

impl QualityEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Composite 0-100 quality score for generated business-plan text.
    pub fn evaluate_business_plan(
        &self,
        content: &str,
        company: &CompanyContext,
        subsidy_kind: &str,
    ) -> f64 {
        self.metrics(content, company, subsidy_kind).overall_score
    }

    /// Full six-dimension breakdown.
    pub fn metrics(
        &self,
        content: &str,
        company: &CompanyContext,
        subsidy_kind: &str,
    ) -> QualityMetrics {
        let relevance = heuristics::relevance(content, company, subsidy_kind);
        let coherence = heuristics::coherence(content);
        let factuality = heuristics::factuality(content, company);
        let completeness = heuristics::completeness(content, subsidy_kind);
        let clarity = heuristics::clarity(content);
        let innovation = heuristics::innovation(content);

        let dimensions = [
            relevance,
            coherence,
            factuality,
            completeness,
            clarity,
            innovation,
        ];
        let overall_score = dimensions
            .iter()
            .zip(QUALITY_WEIGHTS.iter())
            .map(|(score, weight)| score * weight)
            .sum();

        QualityMetrics {
            relevance,
            coherence,
            factuality,
            completeness,
            clarity,
            innovation,
            overall_score,
            confidence_level: confidence_level(&dimensions),
        }
    }

    /// Metrics plus strengths, weaknesses, and a letter grade.
    pub fn comprehensive_evaluation(
        &self,
        content: &str,
        company: &CompanyContext,
        subsidy_kind: &str,
        kind: EvaluationKind,
    ) -> QualityFeedback {
        let metrics = self.metrics(content, company, subsidy_kind);

        let mut strengths = Vec::new();
        let mut weaknesses = Vec::new();
        for (label, score) in DIMENSION_LABELS.iter().zip(metrics.dimensions()) {
            if score >= 80.0 {
                strengths.push(label.to_string());
            } else if score < 70.0 {
                weaknesses.push(label.to_string());
            }
        }

        let grade = QualityGrade::from_score(metrics.overall_score);

        QualityFeedback {
            kind,
            metrics,
            strengths,
            weaknesses,
            grade,
        }
    }
}

fn confidence_level(dimensions: &[f64; 6]) -> f64 {
    let mean = dimensions.iter().sum::<f64>() / dimensions.len() as f64;
    let variance = dimensions
        .iter()
        .map(|score| (score - mean) * (score - mean))
        .sum::<f64>()
        / dimensions.len() as f64;

    (100.0 - variance / 10.0).clamp(50.0, 100.0)
}
