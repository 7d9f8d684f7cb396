use super::CompanyContext;
use crate::scoring::features::{program_keywords, INNOVATION_KEYWORDS};

const LOGICAL_CONNECTORS: [&str; 5] = ["そのため", "また", "さらに", "一方", "したがって"];

const CLARITY_INDICATORS: [&str; 4] = ["具体的に", "例えば", "つまり", "以下の"];

/// Default required elements when a program has no dedicated checklist.
const REQUIRED_ELEMENTS: [&str; 4] = ["事業計画", "市場分析", "資金計画", "実施体制"];

/// Base 70, up to +20 for company-term matches (5 each) and +15 for
/// program-keyword matches (3 each).
pub(super) fn relevance(content: &str, company: &CompanyContext, subsidy_kind: &str) -> f64 {
    let mut score = 70.0;

    let mut company_terms: Vec<&str> = vec![company.name.as_str(), company.industry.as_str()];
    company_terms.extend(company.strengths.iter().map(String::as_str));
    let company_matches = company_terms
        .iter()
        .filter(|term| !term.is_empty() && content.contains(*term))
        .count() as f64;
    score += (company_matches * 5.0).min(20.0);

    if let Some(keywords) = program_keywords(subsidy_kind) {
        let keyword_matches = keywords
            .iter()
            .filter(|keyword| content.contains(*keyword))
            .count() as f64;
        score += (keyword_matches * 3.0).min(15.0);
    }

    score.min(100.0)
}

pub(super) fn coherence(content: &str) -> f64 {
    let mut score = 70.0;

    let paragraphs = content
        .split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .count();
    if paragraphs >= 3 {
        score += 10.0;
    }

    let connector_count: usize = LOGICAL_CONNECTORS
        .iter()
        .map(|connector| content.matches(connector).count())
        .sum();
    score += (connector_count as f64 * 2.0).min(10.0);

    score -= repetition_penalty(content);

    score.clamp(30.0, 100.0)
}

pub(super) fn factuality(content: &str, company: &CompanyContext) -> f64 {
    let mut score = 75.0;

    for token in numeric_tokens(content) {
        if is_reasonable_number(&token) {
            score += 1.0;
        } else {
            score -= 1.0;
        }
    }

    score -= company_data_inconsistencies(content, company).len() as f64 * 5.0;
    score -= unrealistic_claims(content).len() as f64 * 8.0;

    score.clamp(40.0, 100.0)
}

pub(super) fn completeness(content: &str, subsidy_kind: &str) -> f64 {
    let required = required_elements(subsidy_kind);
    let present = required
        .iter()
        .filter(|element| content.contains(*element))
        .count() as f64;

    let mut score = 60.0 + 30.0 * (present / required.len() as f64);
    score += (content.chars().count() as f64 / 100.0).min(10.0);
    score.min(100.0)
}

pub(super) fn clarity(content: &str) -> f64 {
    let mut score = 70.0 + readability(content) * 0.3;
    score += jargon_bonus(content);

    let indicator_count: usize = CLARITY_INDICATORS
        .iter()
        .map(|indicator| content.matches(indicator).count())
        .sum();
    score += (indicator_count as f64 * 2.0).min(8.0);

    score.min(100.0)
}

pub(super) fn innovation(content: &str) -> f64 {
    let lowered = content.to_lowercase();
    let keyword_count: usize = INNOVATION_KEYWORDS
        .iter()
        .map(|keyword| lowered.matches(&keyword.to_lowercase()).count())
        .sum();

    let mut score = 65.0 + (keyword_count as f64 * 3.0).min(20.0);
    score += uniqueness_bonus(content);
    score.min(100.0)
}

/// Step function of average sentence length; short sentences read best.
fn readability(content: &str) -> f64 {
    let sentences: Vec<&str> = content
        .split('。')
        .filter(|sentence| !sentence.trim().is_empty())
        .collect();
    if sentences.is_empty() {
        return 30.0;
    }

    let total_chars: usize = sentences
        .iter()
        .map(|sentence| sentence.chars().count())
        .sum();
    let average = total_chars as f64 / sentences.len() as f64;

    if average < 15.0 {
        90.0
    } else if average < 25.0 {
        70.0
    } else if average < 35.0 {
        50.0
    } else {
        30.0
    }
}

fn required_elements(subsidy_kind: &str) -> [&'static str; 4] {
    match subsidy_kind {
        "ものづくり補助金" => ["事業計画", "設備投資", "資金計画", "実施体制"],
        "IT導入補助金" => ["業務効率化", "導入計画", "資金計画", "実施体制"],
        _ => REQUIRED_ELEMENTS,
    }
}

fn numeric_tokens(content: &str) -> Vec<String> {
    content
        .split(|character: char| !character.is_ascii_digit())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

// The helpers below are deliberate placeholders carried over from the
// original rubric: they contribute fixed constants until a reviewed
// calibration replaces them. Tests pin the current behavior.

fn is_reasonable_number(_token: &str) -> bool {
    true
}

fn company_data_inconsistencies(_content: &str, _company: &CompanyContext) -> Vec<String> {
    Vec::new()
}

fn unrealistic_claims(_content: &str) -> Vec<String> {
    Vec::new()
}

fn repetition_penalty(_content: &str) -> f64 {
    0.0
}

fn jargon_bonus(_content: &str) -> f64 {
    5.0
}

fn uniqueness_bonus(_content: &str) -> f64 {
    10.0
}
