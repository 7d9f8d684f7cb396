use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::ApplicationFeatures;

/// Everything a prediction call returns. Pure output: no identity, no
/// lifecycle, assembled fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Adoption probability in [0, 1], rounded to three decimals.
    pub adoption_probability: f64,
    /// Prediction confidence in [0.3, 0.95].
    pub confidence_score: f64,
    /// Ten component scores on a 0-100 scale, one decimal.
    pub score_breakdown: BTreeMap<String, f64>,
    /// Top five factors ranked by raw feature value, descending.
    pub key_factors: Vec<String>,
    pub improvement_suggestions: Vec<String>,
    pub risk_factors: Vec<String>,
    /// Component score relative to a fixed industry benchmark, ×100.
    pub benchmark_comparison: BTreeMap<String, f64>,
    pub prediction_explanation: Vec<String>,
}

impl PredictionResult {
    /// Simplified result substituted when the model path yields something
    /// unusable. The caller always gets a well-formed payload.
    pub(crate) fn degraded(features: &ApplicationFeatures) -> Self {
        let score_breakdown = features
            .scored_factors()
            .iter()
            .map(|(name, _)| (name.to_string(), 60.0))
            .collect();
        let key_factors = features
            .scored_factors()
            .iter()
            .take(5)
            .map(|(name, _)| name.to_string())
            .collect();

        Self {
            adoption_probability: 0.6,
            confidence_score: 0.5,
            score_breakdown,
            key_factors,
            improvement_suggestions: vec![
                "評価を完了できなかったため、簡易的な結果を表示しています".to_string(),
            ],
            risk_factors: Vec::new(),
            benchmark_comparison: BTreeMap::new(),
            prediction_explanation: vec![
                "評価を完了できなかったため、簡易的な結果を表示しています".to_string(),
            ],
        }
    }
}

/// Fixed industry averages each component is benchmarked against.
const BENCHMARKS: [(&str, f64); 5] = [
    ("innovation_score", 0.65),
    ("market_potential", 0.60),
    ("feasibility_score", 0.70),
    ("budget_reasonableness", 0.75),
    ("company_track_record", 0.58),
];

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

pub(crate) fn score_breakdown(features: &ApplicationFeatures) -> BTreeMap<String, f64> {
    features
        .scored_factors()
        .iter()
        .map(|(name, score)| (name.to_string(), round1(score * 100.0)))
        .collect()
}

/// Top five factor names by raw score. Sorting is stable, so equal scores
/// keep their insertion order.
pub(crate) fn key_factors(features: &ApplicationFeatures) -> Vec<String> {
    let mut factors = features.scored_factors().to_vec();
    factors.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    factors
        .into_iter()
        .take(5)
        .map(|(name, _)| name.to_string())
        .collect()
}

pub(crate) fn improvement_suggestions(features: &ApplicationFeatures) -> Vec<String> {
    const MONITORED: f64 = 0.6;
    let mut suggestions = Vec::new();

    if features.innovation_score < MONITORED {
        suggestions.push(
            "革新性のアピールを強化してください（AI・IoT・DX等の技術要素や独自性の明記）"
                .to_string(),
        );
    }
    if features.market_potential < MONITORED {
        suggestions
            .push("市場規模や顧客ニーズの分析を具体的な数値で補強してください".to_string());
    }
    if features.feasibility_score < MONITORED {
        suggestions.push("実施体制とスケジュールを段階ごとに具体化してください".to_string());
    }
    if features.budget_reasonableness < MONITORED {
        suggestions.push(
            "申請額を補助上限の3〜8割程度に収め、積算根拠を明記してください".to_string(),
        );
    }
    if features.company_track_record < MONITORED {
        suggestions.push("過去の実績や導入事例を追記し、遂行能力を示してください".to_string());
    }
    if features.technology_readiness < MONITORED {
        suggestions.push(
            "プロトタイプやPoCなど技術の成熟度を示す記述を加えてください".to_string(),
        );
    }

    if suggestions.is_empty() {
        suggestions.push(
            "全体として完成度の高い申請内容です。現在の構成を維持してください".to_string(),
        );
    }

    suggestions.truncate(5);
    suggestions
}

pub(crate) fn risk_factors(features: &ApplicationFeatures) -> Vec<String> {
    let mut risks = Vec::new();

    if features.feasibility_score < 0.5 {
        risks.push(
            "実現可能性の記述が不足しており、審査で懸念される可能性があります".to_string(),
        );
    }
    if features.budget_reasonableness < 0.4 {
        risks.push("申請額が補助金の趣旨と乖離しています".to_string());
    }
    if features.company_track_record < 0.4 {
        risks.push("企業実績の記載が弱く、遂行能力への疑念を招きます".to_string());
    }
    if features.technology_readiness < 0.4 {
        risks.push("技術的な裏付けとなる記述が不足しています".to_string());
    }
    if features.market_potential < 0.4 {
        risks.push("市場性の説明が不十分です".to_string());
    }

    risks.truncate(3);
    risks
}

pub(crate) fn benchmark_comparison(features: &ApplicationFeatures) -> BTreeMap<String, f64> {
    let factors: BTreeMap<&str, f64> = features
        .scored_factors()
        .iter()
        .map(|(name, score)| (*name, *score))
        .collect();

    BENCHMARKS
        .iter()
        .map(|(name, average)| {
            let current = factors.get(name).copied().unwrap_or(0.0);
            (name.to_string(), round1(current / average * 100.0))
        })
        .collect()
}

pub(crate) fn prediction_explanation(
    probability: f64,
    features: &ApplicationFeatures,
    key_factors: &[String],
) -> Vec<String> {
    let mut lines = Vec::new();

    let verdict = if probability > 0.8 {
        "採択の可能性が非常に高い申請内容です"
    } else if probability > 0.6 {
        "採択が十分に期待できる申請内容です"
    } else if probability > 0.4 {
        "採択の可能性はありますが、改善の余地があります"
    } else {
        "現状のままでは採択は難しいと想定されます"
    };
    lines.push(verdict.to_string());

    let top: Vec<&str> = key_factors.iter().take(3).map(String::as_str).collect();
    lines.push(format!("評価を押し上げている要素: {}", top.join("、")));

    if features.innovation_score > 0.7 {
        lines.push("革新性が高く評価されています".to_string());
    }
    if features.market_potential > 0.7 {
        lines.push("市場性が高く評価されています".to_string());
    }

    lines
}
