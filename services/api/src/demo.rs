use chrono::{Local, NaiveDate};
use clap::Args;
use std::fs::File;
use std::path::PathBuf;
use subsidy_ai::config::AppConfig;
use subsidy_ai::error::AppError;
use subsidy_ai::scoring::{
    train_model, AdoptionPredictor, ApplicationDraft, CompanyContext, CompanyProfile,
    EvaluationKind, FsModelStore, QualityEvaluator, SubsidyProgram, TrainingDataset,
    TrainingOptions, TrainingReport,
};

#[derive(Args, Debug)]
pub(crate) struct TrainArgs {
    /// CSV export of historical applications with adoption outcomes
    #[arg(long)]
    pub(crate) data: PathBuf,
    /// Directory for the trained artifacts (defaults to APP_MODEL_DIR)
    #[arg(long)]
    pub(crate) model_dir: Option<PathBuf>,
    /// Reference date for years-in-business features (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// RNG seed for the split, folds, and ensembles
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the reference date for the sample prediction (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_training(args: TrainArgs) -> Result<(), AppError> {
    let TrainArgs {
        data,
        model_dir,
        as_of,
        seed,
    } = args;

    let config = AppConfig::load()?;
    let file = File::open(&data)?;
    let dataset = TrainingDataset::from_csv_reader(file)?;

    let store = FsModelStore::new(model_dir.unwrap_or(config.models.dir));
    let mut options = TrainingOptions {
        as_of,
        ..TrainingOptions::default()
    };
    if let Some(seed) = seed {
        options.seed = seed;
    }

    let report = train_model(&dataset, &options, &store)?;
    render_training_report(&report, dataset.examples.len());
    Ok(())
}

fn render_training_report(report: &TrainingReport, total_samples: usize) {
    println!("Training complete on {total_samples} historical applications");
    println!(
        "- Selected model: {} (cv accuracy {:.3})",
        report.selected_model, report.cv_accuracy
    );
    for (family, accuracy) in &report.candidate_cv_accuracy {
        println!("  - candidate {family}: cv accuracy {accuracy:.3}");
    }
    println!(
        "- Held-out accuracy: {:.3} ({} train / {} test samples)",
        report.test_accuracy, report.train_samples, report.test_samples
    );

    let matrix = &report.confusion_matrix;
    println!(
        "- Confusion matrix: tp {} / fp {} / fn {} / tn {}",
        matrix.true_positives,
        matrix.false_positives,
        matrix.false_negatives,
        matrix.true_negatives
    );
    let adopted = &report.classification_report.adopted;
    let rejected = &report.classification_report.rejected;
    println!(
        "- Adopted class: precision {:.3} recall {:.3} f1 {:.3} (support {})",
        adopted.precision, adopted.recall, adopted.f1, adopted.support
    );
    println!(
        "- Rejected class: precision {:.3} recall {:.3} f1 {:.3} (support {})",
        rejected.precision, rejected.recall, rejected.f1, rejected.support
    );

    let mut importances: Vec<(&str, f64)> = report
        .feature_importances
        .iter()
        .map(|(name, weight)| (name.as_str(), *weight))
        .collect();
    importances.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    println!("- Top feature importances:");
    for (name, weight) in importances.into_iter().take(5) {
        println!("  - {name}: {weight:.3}");
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let draft = ApplicationDraft {
        content: "当社はAIとIoTを活用した革新的な製造ラインの自動化に取り組みます。\n\n市場分析では国内需要の拡大を確認しており、顧客ニーズに合わせた差別化を図ります。そのため、具体的な実施体制とスケジュールを策定済みです。\n\nプロトタイプの実証を完了し、資金計画と事業計画を添付の通り整備しています。".to_string(),
        requested_amount: 5_000_000,
    };
    let program = SubsidyProgram {
        kind: "ものづくり補助金".to_string(),
        max_amount: Some(10_000_000),
        target_industries: vec!["製造業".to_string()],
    };
    let company = CompanyProfile {
        industry: "製造業".to_string(),
        employee_count: 45,
        founded_year: Some(2009),
        annual_revenue: Some(250_000_000),
    };

    println!("Subsidy scoring demo (rule-based model)");
    let predictor = AdoptionPredictor::without_model();
    let prediction = predictor.predict_as_of(&draft, &program, &company, today);

    println!(
        "- Adoption probability: {:.1}% (confidence {:.0}%)",
        prediction.adoption_probability * 100.0,
        prediction.confidence_score * 100.0
    );
    println!("- Key factors: {}", prediction.key_factors.join(", "));
    println!("- Score breakdown:");
    for (name, score) in &prediction.score_breakdown {
        println!("  - {name}: {score:.1}");
    }
    println!("- Benchmark comparison (100 = industry average):");
    for (name, ratio) in &prediction.benchmark_comparison {
        println!("  - {name}: {ratio:.1}");
    }
    println!("- Suggestions:");
    for suggestion in &prediction.improvement_suggestions {
        println!("  - {suggestion}");
    }
    if !prediction.risk_factors.is_empty() {
        println!("- Risks:");
        for risk in &prediction.risk_factors {
            println!("  - {risk}");
        }
    }
    println!("- Explanation:");
    for line in &prediction.prediction_explanation {
        println!("  {line}");
    }

    println!("\nDraft quality evaluation");
    let evaluator = QualityEvaluator::new();
    let context = CompanyContext {
        name: "デモ株式会社".to_string(),
        industry: company.industry.clone(),
        strengths: vec!["精密加工".to_string()],
    };
    let feedback = evaluator.comprehensive_evaluation(
        &draft.content,
        &context,
        &program.kind,
        EvaluationKind::BusinessPlan,
    );

    let metrics = &feedback.metrics;
    println!(
        "- Overall: {:.1} (grade {:?}, confidence {:.0})",
        metrics.overall_score, feedback.grade, metrics.confidence_level
    );
    println!(
        "- Dimensions: relevance {:.1} / coherence {:.1} / factuality {:.1} / completeness {:.1} / clarity {:.1} / innovation {:.1}",
        metrics.relevance,
        metrics.coherence,
        metrics.factuality,
        metrics.completeness,
        metrics.clarity,
        metrics.innovation
    );
    if !feedback.strengths.is_empty() {
        println!("- Strengths: {}", feedback.strengths.join(", "));
    }
    if !feedback.weaknesses.is_empty() {
        println!("- Weaknesses: {}", feedback.weaknesses.join(", "));
    }

    Ok(())
}
