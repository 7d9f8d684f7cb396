use serde::{Deserialize, Serialize};

/// Draft application body plus the budget the applicant intends to request.
///
/// Every field carries a serde default so partially filled payloads score
/// instead of failing intake; an empty draft simply extracts to weak features.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationDraft {
    pub content: String,
    pub requested_amount: u64,
}

/// A named government grant scheme the draft targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubsidyProgram {
    /// Program label, e.g. "ものづくり補助金". Selects the keyword table used
    /// for density scoring; unknown labels score zero density.
    pub kind: String,
    /// Upper funding limit in yen. `None` means the program has no cap.
    pub max_amount: Option<u64>,
    /// Industries the program restricts to. Empty means unrestricted.
    pub target_industries: Vec<String>,
}

/// Applicant company snapshot used for track-record and alignment scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    pub industry: String,
    pub employee_count: u32,
    pub founded_year: Option<i32>,
    pub annual_revenue: Option<u64>,
}

/// Number of dimensions in the classifier input vector.
pub const FEATURE_DIMENSIONS: usize = 12;

/// Vector position labels, in the exact order `to_vector` emits them.
/// Training and inference both rely on this ordering.
pub const FEATURE_NAMES: [&str; FEATURE_DIMENSIONS] = [
    "text_length",
    "keyword_density",
    "innovation_score",
    "market_potential",
    "feasibility_score",
    "budget_reasonableness",
    "company_track_record",
    "industry_alignment",
    "technology_readiness",
    "team_capability",
    "risk_assessment",
    "competitive_advantage",
];

const TEXT_LENGTH_SCALE: f64 = 10_000.0;

/// Immutable feature snapshot extracted from one application.
///
/// `text_length` holds the raw character count; all other fields are already
/// clamped to `[0, 1]` by the extractor. Built fresh per prediction, never
/// mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationFeatures {
    pub text_length: f64,
    pub keyword_density: f64,
    pub innovation_score: f64,
    pub market_potential: f64,
    pub feasibility_score: f64,
    pub budget_reasonableness: f64,
    pub company_track_record: f64,
    pub industry_alignment: f64,
    pub technology_readiness: f64,
    pub team_capability: f64,
    /// Higher is better: 1.0 means no risk language detected.
    pub risk_assessment: f64,
    pub competitive_advantage: f64,
}

impl ApplicationFeatures {
    /// Encode as the fixed-order classifier input. Text length is softly
    /// normalized by 10,000 characters; it is the one unbounded dimension.
    pub fn to_vector(&self) -> [f64; FEATURE_DIMENSIONS] {
        [
            self.text_length / TEXT_LENGTH_SCALE,
            self.keyword_density,
            self.innovation_score,
            self.market_potential,
            self.feasibility_score,
            self.budget_reasonableness,
            self.company_track_record,
            self.industry_alignment,
            self.technology_readiness,
            self.team_capability,
            self.risk_assessment,
            self.competitive_advantage,
        ]
    }

    /// The ten named factors that participate in the fallback weighted sum,
    /// score breakdown, and key-factor ranking. Insertion order is the
    /// tie-break order for ranking.
    pub fn scored_factors(&self) -> [(&'static str, f64); 10] {
        [
            ("innovation_score", self.innovation_score),
            ("market_potential", self.market_potential),
            ("feasibility_score", self.feasibility_score),
            ("budget_reasonableness", self.budget_reasonableness),
            ("company_track_record", self.company_track_record),
            ("industry_alignment", self.industry_alignment),
            ("technology_readiness", self.technology_readiness),
            ("team_capability", self.team_capability),
            ("risk_assessment", self.risk_assessment),
            ("competitive_advantage", self.competitive_advantage),
        ]
    }
}
