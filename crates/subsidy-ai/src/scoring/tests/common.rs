use std::sync::Mutex;

use chrono::NaiveDate;

use crate::scoring::domain::{ApplicationDraft, CompanyProfile, SubsidyProgram};
use crate::scoring::model::{ModelSnapshot, ModelStore, ModelStoreError};
use crate::scoring::trainer::{TrainingDataset, TrainingExample};

pub(super) fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 23).expect("valid date")
}

/// The canonical manufacturing scenario: strong draft, exact industry match,
/// budget at half the program cap.
pub(super) fn draft() -> ApplicationDraft {
    ApplicationDraft {
        content: "当社はAIとIoTを活用し革新的な製造効率化を実現します".to_string(),
        requested_amount: 5_000_000,
    }
}

pub(super) fn program() -> SubsidyProgram {
    SubsidyProgram {
        kind: "ものづくり補助金".to_string(),
        max_amount: Some(10_000_000),
        target_industries: vec!["製造業".to_string()],
    }
}

pub(super) fn company() -> CompanyProfile {
    CompanyProfile {
        industry: "製造業".to_string(),
        employee_count: 60,
        founded_year: Some(2010),
        annual_revenue: Some(200_000_000),
    }
}

/// Model store backed by a mutex slot, so trainer and predictor tests can
/// run without touching the filesystem.
#[derive(Default)]
pub(super) struct InMemoryModelStore {
    slot: Mutex<Option<ModelSnapshot>>,
}

impl ModelStore for InMemoryModelStore {
    fn load(&self) -> Result<Option<ModelSnapshot>, ModelStoreError> {
        Ok(self.slot.lock().expect("store mutex poisoned").clone())
    }

    fn save(&self, snapshot: &ModelSnapshot) -> Result<(), ModelStoreError> {
        *self.slot.lock().expect("store mutex poisoned") = Some(snapshot.clone());
        Ok(())
    }
}

fn strong_example(step: u32) -> TrainingExample {
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

fn weak_example(step: u32) -> TrainingExample {
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

/// Separable synthetic history: strong drafts were adopted, weak ones were
/// rejected.
pub(super) fn synthetic_dataset(per_class: u32) -> TrainingDataset {
    let mut examples = Vec::new();
    for step in 0..per_class {
        examples.push(strong_example(step));
        examples.push(weak_example(step));
    }
    TrainingDataset::new(examples)
}
