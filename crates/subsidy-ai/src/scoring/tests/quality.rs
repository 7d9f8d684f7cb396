use crate::scoring::quality::{
    CompanyContext, EvaluationKind, QualityEvaluator, QualityGrade,
};

fn context() -> CompanyContext {
    CompanyContext {
        name: "株式会社テスト製作所".to_string(),
        industry: "製造業".to_string(),
        strengths: vec!["精密加工".to_string()],
    }
}

fn plan_text() -> String {
    [
        "当社の事業計画は製造業の生産性向上を目的とします。",
        "具体的には、設備投資により精密加工の能力を高めます。",
        "そのため、資金計画と実施体制を明確に定めました。さらに、AIを活用した革新的な品質管理を導入します。",
    ]
    .join("\n\n")
}

#[test]
fn overall_score_is_the_weighted_composite() {
    let evaluator = QualityEvaluator::new();
    let metrics = evaluator.metrics(&plan_text(), &context(), "ものづくり補助金");

    let expected = metrics.relevance * 0.25
        + metrics.coherence * 0.20
        + metrics.factuality * 0.20
        + metrics.completeness * 0.15
        + metrics.clarity * 0.10
        + metrics.innovation * 0.10;
    assert!((metrics.overall_score - expected).abs() < 1e-6);

    let composite = evaluator.evaluate_business_plan(&plan_text(), &context(), "ものづくり補助金");
    assert!((composite - metrics.overall_score).abs() < 1e-9);
}

#[test]
fn evaluation_is_deterministic() {
    let evaluator = QualityEvaluator::new();
    let first = evaluator.metrics(&plan_text(), &context(), "ものづくり補助金");
    let second = evaluator.metrics(&plan_text(), &context(), "ものづくり補助金");
    assert_eq!(first, second);
}

#[test]
fn dimension_floors_hold_for_hostile_input() {
    let evaluator = QualityEvaluator::new();
    let metrics = evaluator.metrics("", &CompanyContext::default(), "");

    assert!(metrics.coherence >= 30.0);
    assert!(metrics.factuality >= 40.0);
    for score in [
        metrics.relevance,
        metrics.coherence,
        metrics.factuality,
        metrics.completeness,
        metrics.clarity,
        metrics.innovation,
    ] {
        assert!((0.0..=100.0).contains(&score));
    }
    assert!((50.0..=100.0).contains(&metrics.confidence_level));
}

#[test]
fn empty_content_scores_are_pinned() {
    let evaluator = QualityEvaluator::new();
    let metrics = evaluator.metrics("", &CompanyContext::default(), "");

    assert_eq!(metrics.relevance, 70.0);
    assert_eq!(metrics.coherence, 70.0);
    assert_eq!(metrics.factuality, 75.0);
    assert_eq!(metrics.completeness, 60.0);
    // 70 base + 30 readability floor * 0.3 + 5 jargon placeholder.
    assert_eq!(metrics.clarity, 84.0);
    // 65 base + 10 uniqueness placeholder.
    assert_eq!(metrics.innovation, 75.0);
}

#[test]
fn completeness_saturates_with_all_elements_and_length() {
    let evaluator = QualityEvaluator::new();
    let mut content = "事業計画、設備投資、資金計画、実施体制を全て記載。".to_string();
    content.push_str(&"あ".repeat(1_000));

    let metrics = evaluator.metrics(&content, &context(), "ものづくり補助金");
    assert_eq!(metrics.completeness, 100.0);
}

#[test]
fn relevance_rewards_company_and_program_terms() {
    let evaluator = QualityEvaluator::new();
    let on_topic = evaluator.metrics(&plan_text(), &context(), "ものづくり補助金");
    let off_topic = evaluator.metrics("補助金を希望します。", &context(), "ものづくり補助金");
    assert!(on_topic.relevance > off_topic.relevance);
}

#[test]
fn grade_bands_match_the_cutoffs() {
    assert_eq!(QualityGrade::from_score(90.0), QualityGrade::A);
    assert_eq!(QualityGrade::from_score(89.9), QualityGrade::B);
    assert_eq!(QualityGrade::from_score(80.0), QualityGrade::B);
    assert_eq!(QualityGrade::from_score(79.9), QualityGrade::C);
    assert_eq!(QualityGrade::from_score(70.0), QualityGrade::C);
    assert_eq!(QualityGrade::from_score(60.0), QualityGrade::D);
    assert_eq!(QualityGrade::from_score(59.9), QualityGrade::F);
}

#[test]
fn feedback_splits_dimensions_by_thresholds() {
    let evaluator = QualityEvaluator::new();
    let feedback = evaluator.comprehensive_evaluation(
        &plan_text(),
        &context(),
        "ものづくり補助金",
        EvaluationKind::BusinessPlan,
    );

    assert_eq!(feedback.kind, EvaluationKind::BusinessPlan);
    assert_eq!(
        feedback.grade,
        QualityGrade::from_score(feedback.metrics.overall_score)
    );

    let labeled = [
        ("関連性", feedback.metrics.relevance),
        ("論理構成", feedback.metrics.coherence),
        ("事実性", feedback.metrics.factuality),
        ("網羅性", feedback.metrics.completeness),
        ("明瞭さ", feedback.metrics.clarity),
        ("革新性", feedback.metrics.innovation),
    ];
    for (label, score) in labeled {
        let in_strengths = feedback.strengths.iter().any(|entry| entry == label);
        let in_weaknesses = feedback.weaknesses.iter().any(|entry| entry == label);
        assert_eq!(in_strengths, score >= 80.0, "{label}");
        assert_eq!(in_weaknesses, score < 70.0, "{label}");
    }
}

#[test]
fn uniform_dimensions_yield_full_confidence() {
    let evaluator = QualityEvaluator::new();
    // Empty input keeps the sub-scores close together, so the spread penalty
    // stays small.
    let metrics = evaluator.metrics("", &CompanyContext::default(), "");
    assert!(metrics.confidence_level > 90.0);
}
