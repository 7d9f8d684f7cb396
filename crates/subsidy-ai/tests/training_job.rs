//! Integration specifications for the offline training job: train on
//! historical outcomes, persist the winning model, and hot-swap it into the
//! serving path.

mod common {
    use std::sync::Arc;

    use subsidy_ai::scoring::{
        ApplicationDraft, CompanyProfile, FsModelStore, ScoringService, SubsidyProgram,
        TrainingDataset, TrainingExample, TrainingOptions,
    };
    use subsidy_ai::scoring::model::{BoostingParams, ForestParams};
    use tempfile::TempDir;

    pub(super) fn program() -> SubsidyProgram {
        SubsidyProgram {
            kind: "ものづくり補助金".to_string(),
            max_amount: Some(10_000_000),
            target_industries: vec!["製造業".to_string()],
        }
    }

    fn adopted_example(step: u32) -> TrainingExample {
        TrainingExample {
            draft: ApplicationDraft {
                content: "AIとIoTを活用した革新的な生産性向上の事業計画。市場の需要と顧客ニーズを分析し、具体的な実施体制とスケジュールを策定済み。プロトタイプの実証とPoCを完了し、差別化による優位性を確立しています。".to_string(),
                requested_amount: 4_000_000 + u64::from(step) * 100_000,
            },
            program: program(),
            company: CompanyProfile {
                industry: "製造業".to_string(),
                employee_count: 40 + step,
                founded_year: Some(2008),
                annual_revenue: Some(300_000_000),
            },
            adopted: true,
        }
    }

    fn rejected_example(step: u32) -> TrainingExample {
        TrainingExample {
            draft: ApplicationDraft {
                content: "補助金を希望します。課題が多くリスクと懸念があり、実施は未経験です。".to_string(),
                requested_amount: 0,
            },
            program: program(),
            company: CompanyProfile {
                industry: "飲食業".to_string(),
                employee_count: 1 + step % 4,
                founded_year: None,
                annual_revenue: None,
            },
            adopted: false,
        }
    }

    pub(super) fn history(per_class: u32) -> TrainingDataset {
        let mut examples = Vec::new();
        for step in 0..per_class {
            examples.push(adopted_example(step));
            examples.push(rejected_example(step));
        }
        TrainingDataset::new(examples)
    }

    pub(super) fn fast_options() -> TrainingOptions {
        TrainingOptions {
            forest: ForestParams {
                trees: 10,
                ..ForestParams::default()
            },
            boosting: BoostingParams {
                stages: 10,
                ..BoostingParams::default()
            },
            ..TrainingOptions::default()
        }
    }

    pub(super) fn build_service() -> (Arc<ScoringService<FsModelStore>>, TempDir) {
        let dir = TempDir::new().expect("temp model dir");
        let store = Arc::new(FsModelStore::new(dir.path()));
        (Arc::new(ScoringService::new(store)), dir)
    }
}

mod training {
    use super::common::*;
    use subsidy_ai::scoring::{FsModelStore, ScoringService, TrainingError};

    #[test]
    fn retrain_persists_artifacts_and_swaps_the_model_in() {
        let (service, dir) = build_service();
        assert!(service.model_name().is_none());

        let report = service
            .retrain(&history(20), &fast_options())
            .expect("training succeeds");

        assert!(report.test_accuracy >= 0.9);
        assert_eq!(service.model_name(), Some(report.selected_model.as_str()));

        // Both artifacts land on disk together.
        assert!(dir.path().join("adoption_predictor.json").exists());
        assert!(dir.path().join("feature_scaler.json").exists());
    }

    #[test]
    fn persisted_model_survives_a_restart() {
        let (service, dir) = build_service();
        let report = service
            .retrain(&history(15), &fast_options())
            .expect("training succeeds");
        drop(service);

        let store = std::sync::Arc::new(FsModelStore::new(dir.path()));
        let restarted = ScoringService::new(store);
        assert_eq!(restarted.model_name(), Some(report.selected_model.as_str()));
    }

    #[test]
    fn undertrained_dataset_leaves_the_fallback_in_place() {
        let (service, dir) = build_service();

        let result = service.retrain(&history(3), &fast_options());
        assert!(matches!(
            result,
            Err(TrainingError::InsufficientSamples { .. })
        ));

        assert!(service.model_name().is_none());
        assert!(!dir.path().join("adoption_predictor.json").exists());
    }
}
