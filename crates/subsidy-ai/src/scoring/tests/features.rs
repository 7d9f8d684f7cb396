use super::common::*;
use crate::scoring::domain::{
    ApplicationDraft, CompanyProfile, SubsidyProgram, FEATURE_DIMENSIONS,
};
use crate::scoring::features::FeatureExtractor;

fn extract(
    draft: &ApplicationDraft,
    program: &SubsidyProgram,
    company: &CompanyProfile,
) -> crate::scoring::domain::ApplicationFeatures {
    FeatureExtractor::new().extract(draft, program, company, reference_date())
}

#[test]
fn vector_has_fixed_dimensions_and_order() {
    let features = extract(&draft(), &program(), &company());
    let vector = features.to_vector();

    assert_eq!(vector.len(), FEATURE_DIMENSIONS);
    assert_eq!(vector[0], features.text_length / 10_000.0);
    assert_eq!(vector[1], features.keyword_density);
    assert_eq!(vector[11], features.competitive_advantage);
}

#[test]
fn bounded_features_stay_in_unit_interval() {
    let features = extract(&draft(), &program(), &company());
    for (name, value) in features.scored_factors() {
        assert!(
            (0.0..=1.0).contains(&value),
            "{name} out of range: {value}"
        );
    }
    assert!((0.0..=1.0).contains(&features.keyword_density));
}

#[test]
fn manufacturing_scenario_matches_expected_scores() {
    let features = extract(&draft(), &program(), &company());

    // Exact industry match against the program's target list.
    assert_eq!(features.industry_alignment, 1.0);
    // Requested 5M of a 10M cap lands in the 0.3-0.8 sweet spot.
    assert_eq!(features.budget_reasonableness, 0.9);
    // AI + IoT + 革新 matched, plus the tech-industry bonus.
    assert!(features.innovation_score >= 0.6);
    assert_eq!(features.text_length, draft().content.chars().count() as f64);
}

#[test]
fn zero_requested_amount_scores_exactly_point_three() {
    let mut draft = draft();
    draft.requested_amount = 0;
    let features = extract(&draft, &program(), &company());
    assert_eq!(features.budget_reasonableness, 0.3);
}

#[test]
fn over_cap_request_is_penalized() {
    let mut draft = draft();
    draft.requested_amount = 20_000_000;
    let features = extract(&draft, &program(), &company());
    assert_eq!(features.budget_reasonableness, 0.1);
}

#[test]
fn uncapped_program_scores_midrange_budget() {
    let mut program = program();
    program.max_amount = None;
    let features = extract(&draft(), &program, &company());
    assert_eq!(features.budget_reasonableness, 0.9);
}

#[test]
fn empty_target_industries_mean_no_restriction() {
    let mut program = program();
    program.target_industries.clear();
    let features = extract(&draft(), &program, &company());
    assert_eq!(features.industry_alignment, 0.7);
}

#[test]
fn partial_industry_match_scores_point_eight() {
    let mut company = company();
    company.industry = "金属製造業".to_string();
    let features = extract(&draft(), &program(), &company);
    assert_eq!(features.industry_alignment, 0.8);
}

#[test]
fn unrelated_industry_scores_point_three() {
    let mut company = company();
    company.industry = "飲食業".to_string();
    let features = extract(&draft(), &program(), &company);
    assert_eq!(features.industry_alignment, 0.3);
}

#[test]
fn track_record_sums_the_size_age_and_revenue_tiers() {
    let features = extract(&draft(), &program(), &company());
    // 60 employees (+0.15), 16 years in business (+0.15), 200M revenue (+0.1).
    assert!((features.company_track_record - 0.9).abs() < 1e-9);
}

#[test]
fn team_capability_sums_the_headcount_and_industry_bonuses() {
    let features = extract(&draft(), &program(), &company());
    // 60 employees (+0.2) in a tech-adjacent industry (+0.15).
    assert!((features.team_capability - 0.85).abs() < 1e-9);

    let mut small = company();
    small.employee_count = 3;
    small.industry = "飲食業".to_string();
    let features = extract(&draft(), &program(), &small);
    assert!((features.team_capability - 0.5).abs() < 1e-9);
}

#[test]
fn unknown_program_kind_has_zero_density() {
    let mut program = program();
    program.kind = "存在しない補助金".to_string();
    let features = extract(&draft(), &program, &company());
    assert_eq!(features.keyword_density, 0.0);
}

#[test]
fn risk_score_counts_repeated_occurrences() {
    let mut draft = draft();
    draft.content = "課題。課題。課題。リスク。リスク。懸念。不足。遅延。困難。".to_string();
    let features = extract(&draft, &program(), &company());
    // Nine occurrences push the score to the 0.2 floor.
    assert_eq!(features.risk_assessment, 0.2);
}

#[test]
fn defaulted_inputs_extract_without_panicking() {
    let features = extract(
        &ApplicationDraft::default(),
        &SubsidyProgram::default(),
        &CompanyProfile::default(),
    );

    assert_eq!(features.text_length, 0.0);
    assert_eq!(features.keyword_density, 0.0);
    assert_eq!(features.budget_reasonableness, 0.3);
    // Empty target list means unrestricted.
    assert_eq!(features.industry_alignment, 0.7);
    for (name, value) in features.scored_factors() {
        assert!(value.is_finite(), "{name} not finite");
    }
}

#[test]
fn extraction_is_deterministic() {
    let first = extract(&draft(), &program(), &company());
    let second = extract(&draft(), &program(), &company());
    assert_eq!(first, second);
}
