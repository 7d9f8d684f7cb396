use chrono::{Datelike, NaiveDate};

use super::domain::{ApplicationDraft, ApplicationFeatures, CompanyProfile, SubsidyProgram};

/// Keyword tables keyed by program label for density scoring. A program not
/// listed here scores zero density rather than failing.
const PROGRAM_KEYWORDS: [(&str, &[&str]); 4] = [
    (
        "ものづくり補助金",
        &[
            "生産性",
            "設備投資",
            "試作",
            "革新的サービス",
            "製造",
            "工程改善",
        ],
    ),
    (
        "IT導入補助金",
        &["ITツール", "業務効率化", "クラウド", "デジタル化", "システム導入"],
    ),
    (
        "小規模事業者持続化補助金",
        &["販路開拓", "集客", "広報", "地域", "持続的"],
    ),
    (
        "事業再構築補助金",
        &["新分野展開", "業態転換", "事業転換", "再構築", "成長分野"],
    ),
];

pub(crate) const INNOVATION_KEYWORDS: [&str; 10] = [
    "AI",
    "IoT",
    "DX",
    "革新",
    "イノベーション",
    "新技術",
    "特許",
    "独自",
    "自動化",
    "デジタル",
];

const MARKET_KEYWORDS: [&str; 8] = [
    "市場",
    "需要",
    "成長",
    "顧客",
    "販路",
    "シェア",
    "海外展開",
    "ニーズ",
];

const FEASIBILITY_KEYWORDS: [&str; 8] = [
    "計画",
    "実績",
    "体制",
    "スケジュール",
    "検証",
    "具体的",
    "段階",
    "パートナー",
];

const READINESS_KEYWORDS: [&str; 8] = [
    "プロトタイプ",
    "PoC",
    "実証",
    "試作",
    "テスト",
    "検証済",
    "運用",
    "導入済",
];

const RISK_KEYWORDS: [&str; 8] = [
    "課題",
    "リスク",
    "未経験",
    "不足",
    "懸念",
    "遅延",
    "困難",
    "不確実",
];

const ADVANTAGE_KEYWORDS: [&str; 8] = [
    "優位",
    "差別化",
    "独自性",
    "競合",
    "強み",
    "先行",
    "参入障壁",
    "ノウハウ",
];

/// Industries treated as technology-adjacent for the innovation and team
/// capability bonuses.
const TECH_INDUSTRIES: [&str; 3] = ["IT", "テクノロジー", "製造業"];

/// Deterministic mapper from typed application inputs to the feature
/// snapshot. Stateless; every method is a pure function of its arguments so
/// extraction can run concurrently without coordination.
#[derive(Debug, Default, Clone, Copy)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract the full feature snapshot. `today` anchors the years-in-business
    /// calculation so callers (and tests) control the reference date.
    pub fn extract(
        &self,
        draft: &ApplicationDraft,
        program: &SubsidyProgram,
        company: &CompanyProfile,
        today: NaiveDate,
    ) -> ApplicationFeatures {
        let content = draft.content.to_lowercase();
        let years_in_business = years_in_business(company, today);

        ApplicationFeatures {
            text_length: draft.content.chars().count() as f64,
            keyword_density: keyword_density(&content, &program.kind),
            innovation_score: innovation_score(&content, &company.industry),
            market_potential: market_potential(&content, company.employee_count),
            feasibility_score: feasibility_score(&content, years_in_business),
            budget_reasonableness: budget_reasonableness(
                draft.requested_amount,
                program.max_amount,
            ),
            company_track_record: company_track_record(company, years_in_business),
            industry_alignment: industry_alignment(
                &company.industry,
                &program.target_industries,
            ),
            technology_readiness: technology_readiness(&content),
            team_capability: team_capability(company),
            risk_assessment: risk_assessment(&content),
            competitive_advantage: competitive_advantage(&content),
        }
    }
}

fn years_in_business(company: &CompanyProfile, today: NaiveDate) -> i32 {
    company
        .founded_year
        .map(|founded| (today.year() - founded).max(0))
        .unwrap_or(0)
}

/// Keyword table for a program label, shared with the quality evaluator's
/// relevance scoring.
pub(crate) fn program_keywords(program_kind: &str) -> Option<&'static [&'static str]> {
    PROGRAM_KEYWORDS
        .iter()
        .find(|(kind, _)| *kind == program_kind)
        .map(|(_, keywords)| *keywords)
}

fn count_matches(content: &str, keywords: &[&str]) -> usize {
    keywords
        .iter()
        .filter(|keyword| content.contains(&keyword.to_lowercase()))
        .count()
}

/// Fraction of the program's keyword table present in the draft. Programs
/// without a configured table score zero.
fn keyword_density(content: &str, program_kind: &str) -> f64 {
    match program_keywords(program_kind) {
        Some(keywords) if !keywords.is_empty() => {
            let matched = count_matches(content, keywords) as f64;
            (matched / keywords.len() as f64).clamp(0.0, 1.0)
        }
        _ => 0.0,
    }
}

fn innovation_score(content: &str, industry: &str) -> f64 {
    let mut score = 0.5;
    score += count_matches(content, &INNOVATION_KEYWORDS) as f64 * 0.05;
    if TECH_INDUSTRIES.contains(&industry) {
        score += 0.1;
    }
    score.min(1.0)
}

fn market_potential(content: &str, employee_count: u32) -> f64 {
    let mut score = 0.5;
    score += count_matches(content, &MARKET_KEYWORDS) as f64 * 0.04;
    if employee_count > 50 {
        score += 0.1;
    } else if employee_count > 10 {
        score += 0.05;
    }
    score.min(1.0)
}

fn feasibility_score(content: &str, years_in_business: i32) -> f64 {
    let mut score = 0.5;
    score += count_matches(content, &FEASIBILITY_KEYWORDS) as f64 * 0.04;
    if years_in_business > 5 {
        score += 0.1;
    } else if years_in_business > 2 {
        score += 0.05;
    }
    score.min(1.0)
}

/// Tiered by the requested/cap ratio. The sweet spot is asking for 30-80% of
/// the program cap; zero or over-cap requests are penalized hard.
fn budget_reasonableness(requested: u64, max_amount: Option<u64>) -> f64 {
    if requested == 0 {
        return 0.3;
    }

    let ratio = match max_amount {
        Some(cap) if cap > 0 => requested as f64 / cap as f64,
        // Uncapped program: treat the request as mid-range.
        _ => 0.5,
    };

    if ratio > 1.0 {
        0.1
    } else if (0.3..=0.8).contains(&ratio) {
        0.9
    } else if (0.1..0.3).contains(&ratio) {
        0.7
    } else if ratio > 0.8 {
        0.6
    } else {
        0.4
    }
}

fn company_track_record(company: &CompanyProfile, years_in_business: i32) -> f64 {
    let mut score: f64 = 0.5;

    if company.employee_count > 100 {
        score += 0.2;
    } else if company.employee_count > 50 {
        score += 0.15;
    } else if company.employee_count > 10 {
        score += 0.1;
    }

    if years_in_business > 10 {
        score += 0.15;
    } else if years_in_business > 5 {
        score += 0.1;
    } else if years_in_business > 2 {
        score += 0.05;
    }

    match company.annual_revenue {
        Some(revenue) if revenue > 1_000_000_000 => score += 0.15,
        Some(revenue) if revenue > 100_000_000 => score += 0.1,
        _ => {}
    }

    score.min(1.0)
}

fn industry_alignment(industry: &str, target_industries: &[String]) -> f64 {
    if target_industries.is_empty() {
        // No restriction configured for the program.
        return 0.7;
    }

    if target_industries.iter().any(|target| target == industry) {
        return 1.0;
    }

    let partial = target_industries
        .iter()
        .any(|target| target.contains(industry) || industry.contains(target.as_str()));
    if partial && !industry.is_empty() {
        0.8
    } else {
        0.3
    }
}

fn technology_readiness(content: &str) -> f64 {
    let score = 0.4 + count_matches(content, &READINESS_KEYWORDS) as f64 * 0.08;
    score.min(1.0)
}

fn team_capability(company: &CompanyProfile) -> f64 {
    let mut score: f64 = 0.5;

    if company.employee_count >= 20 {
        score += 0.2;
    } else if company.employee_count >= 10 {
        score += 0.15;
    } else if company.employee_count >= 5 {
        score += 0.1;
    }

    if TECH_INDUSTRIES.contains(&company.industry.as_str()) {
        score += 0.15;
    }

    score.min(1.0)
}

/// Counts every occurrence of risk language, not just distinct terms; a draft
/// that repeats "課題" five times reads riskier than one that mentions it once.
fn risk_assessment(content: &str) -> f64 {
    let occurrences: usize = RISK_KEYWORDS
        .iter()
        .map(|keyword| content.matches(&keyword.to_lowercase()).count())
        .sum();
    (1.0 - occurrences as f64 * 0.1).max(0.2)
}

fn competitive_advantage(content: &str) -> f64 {
    let score = 0.4 + count_matches(content, &ADVANTAGE_KEYWORDS) as f64 * 0.07;
    score.min(1.0)
}
