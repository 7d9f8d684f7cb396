use std::collections::BTreeMap;
use std::io::Read;

use chrono::{NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{
    ApplicationDraft, CompanyProfile, SubsidyProgram, FEATURE_NAMES,
};
use super::features::FeatureExtractor;
use super::model::{
    BoostingParams, ForestParams, GradientBoostingClassifier, ModelSnapshot, ModelStore,
    ModelStoreError, RandomForestClassifier, StandardScaler, TrainedClassifier,
};

const CV_FOLDS: usize = 5;
const MINIMUM_SAMPLES: usize = 10;

/// One historical application with its adoption outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub draft: ApplicationDraft,
    pub program: SubsidyProgram,
    pub company: CompanyProfile,
    pub adopted: bool,
}

/// Batch of historical outcomes consumed once by a training run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingDataset {
    pub examples: Vec<TrainingExample>,
}

/// Flat CSV row for bulk-loading historical outcomes from exports.
#[derive(Debug, Deserialize)]
struct DatasetRow {
    content: String,
    requested_amount: u64,
    program_kind: String,
    max_amount: Option<u64>,
    /// Semicolon-separated list.
    target_industries: String,
    industry: String,
    employee_count: u32,
    founded_year: Option<i32>,
    annual_revenue: Option<u64>,
    adopted: u8,
}

impl TrainingDataset {
    pub fn new(examples: Vec<TrainingExample>) -> Self {
        Self { examples }
    }

    /// Load from a CSV export with one row per historical application.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, TrainingError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut examples = Vec::new();

        for row in csv_reader.deserialize() {
            let row: DatasetRow = row?;
            let target_industries = row
                .target_industries
                .split(';')
                .map(str::trim)
                .filter(|industry| !industry.is_empty())
                .map(str::to_string)
                .collect();

            examples.push(TrainingExample {
                draft: ApplicationDraft {
                    content: row.content,
                    requested_amount: row.requested_amount,
                },
                program: SubsidyProgram {
                    kind: row.program_kind,
                    max_amount: row.max_amount,
                    target_industries,
                },
                company: CompanyProfile {
                    industry: row.industry,
                    employee_count: row.employee_count,
                    founded_year: row.founded_year,
                    annual_revenue: row.annual_revenue,
                },
                adopted: row.adopted != 0,
            });
        }

        Ok(Self { examples })
    }
}

/// Knobs for one training run. Defaults reproduce the production setup;
/// the ensemble sizes are only lowered in tests.
#[derive(Debug, Clone)]
pub struct TrainingOptions {
    pub validation_split: f64,
    pub seed: u64,
    /// Reference date for years-in-business features. `None` uses today.
    pub as_of: Option<NaiveDate>,
    pub forest: ForestParams,
    pub boosting: BoostingParams,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            validation_split: 0.2,
            seed: 42,
            as_of: None,
            forest: ForestParams::default(),
            boosting: BoostingParams::default(),
        }
    }
}

/// Why a training run could not produce a model. Training is the one path in
/// the scoring core that reports failure to its caller.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("training dataset is empty")]
    EmptyDataset,
    #[error("training dataset contains only one outcome class")]
    SingleClass,
    #[error("training needs at least {minimum} samples, got {actual}")]
    InsufficientSamples { minimum: usize, actual: usize },
    #[error("training dataset could not be parsed: {0}")]
    Dataset(#[from] csv::Error),
    #[error(transparent)]
    Store(#[from] ModelStoreError),
}

/// Per-class precision/recall/F1 with support counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub adopted: ClassMetrics,
    pub rejected: ClassMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_positives: usize,
}

/// Structured outcome of one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub selected_model: String,
    /// Mean 5-fold CV accuracy of the selected candidate on the train split.
    pub cv_accuracy: f64,
    /// Mean CV accuracy per candidate family.
    pub candidate_cv_accuracy: BTreeMap<String, f64>,
    pub test_accuracy: f64,
    pub classification_report: ClassificationReport,
    pub confusion_matrix: ConfusionMatrix,
    pub feature_importances: BTreeMap<String, f64>,
    pub train_samples: usize,
    pub test_samples: usize,
}

/// Fit both candidate ensembles, select by cross-validation, evaluate on the
/// held-out split, persist the winner, and report.
pub fn train_model(
    dataset: &TrainingDataset,
    options: &TrainingOptions,
    store: &dyn ModelStore,
) -> Result<TrainingReport, TrainingError> {
    if dataset.examples.is_empty() {
        return Err(TrainingError::EmptyDataset);
    }
    if dataset.examples.len() < MINIMUM_SAMPLES {
        return Err(TrainingError::InsufficientSamples {
            minimum: MINIMUM_SAMPLES,
            actual: dataset.examples.len(),
        });
    }

    let as_of = options.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let extractor = FeatureExtractor::new();
    let rows: Vec<Vec<f64>> = dataset
        .examples
        .iter()
        .map(|example| {
            extractor
                .extract(&example.draft, &example.program, &example.company, as_of)
                .to_vector()
                .to_vec()
        })
        .collect();
    let labels: Vec<bool> = dataset.examples.iter().map(|example| example.adopted).collect();

    if labels.iter().all(|&label| label) || labels.iter().all(|&label| !label) {
        return Err(TrainingError::SingleClass);
    }

    let mut rng = StdRng::seed_from_u64(options.seed);
    let (train_indices, test_indices) =
        stratified_split(&labels, options.validation_split, &mut rng);

    let train_rows: Vec<Vec<f64>> = train_indices.iter().map(|&index| rows[index].clone()).collect();
    let train_labels: Vec<bool> = train_indices.iter().map(|&index| labels[index]).collect();
    let test_rows: Vec<Vec<f64>> = test_indices.iter().map(|&index| rows[index].clone()).collect();
    let test_labels: Vec<bool> = test_indices.iter().map(|&index| labels[index]).collect();

    // Scaler statistics come from the train split only; the test split must
    // stay unseen.
    let scaler = StandardScaler::fit(&train_rows);
    let train_scaled = scaler.transform_all(&train_rows);
    let test_scaled = scaler.transform_all(&test_rows);

    let forest_cv = cross_validate(&train_scaled, &train_labels, options, Candidate::Forest, &mut rng);
    let boosting_cv =
        cross_validate(&train_scaled, &train_labels, options, Candidate::Boosting, &mut rng);

    let mut candidate_cv_accuracy = BTreeMap::new();
    candidate_cv_accuracy.insert("random_forest".to_string(), forest_cv);
    candidate_cv_accuracy.insert("gradient_boosting".to_string(), boosting_cv);

    let winner = if boosting_cv > forest_cv {
        Candidate::Boosting
    } else {
        Candidate::Forest
    };
    let cv_accuracy = forest_cv.max(boosting_cv);

    let classifier = winner.fit(&train_scaled, &train_labels, options, &mut rng);

    let predictions: Vec<bool> = test_scaled
        .iter()
        .map(|row| classifier.predict_proba(row) >= 0.5)
        .collect();
    let confusion_matrix = confusion(&test_labels, &predictions);
    let test_accuracy = accuracy_from_confusion(&confusion_matrix);
    let classification_report = classification_report(&confusion_matrix);

    let feature_importances = FEATURE_NAMES
        .iter()
        .map(|name| name.to_string())
        .zip(classifier.feature_importances())
        .collect();

    let snapshot = ModelSnapshot {
        classifier,
        scaler,
        trained_at: Utc::now(),
    };
    store.save(&snapshot)?;

    info!(
        model = snapshot.classifier.name(),
        cv_accuracy,
        test_accuracy,
        train_samples = train_indices.len(),
        test_samples = test_indices.len(),
        "training run complete"
    );

    Ok(TrainingReport {
        selected_model: snapshot.classifier.name().to_string(),
        cv_accuracy,
        candidate_cv_accuracy,
        test_accuracy,
        classification_report,
        confusion_matrix,
        feature_importances,
        train_samples: train_indices.len(),
        test_samples: test_indices.len(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    Forest,
    Boosting,
}

impl Candidate {
    fn fit(
        self,
        rows: &[Vec<f64>],
        labels: &[bool],
        options: &TrainingOptions,
        rng: &mut StdRng,
    ) -> TrainedClassifier {
        match self {
            Candidate::Forest => TrainedClassifier::RandomForest(RandomForestClassifier::fit(
                rows,
                labels,
                options.forest,
                rng,
            )),
            Candidate::Boosting => {
                TrainedClassifier::GradientBoosting(GradientBoostingClassifier::fit(
                    rows,
                    labels,
                    options.boosting,
                    rng,
                ))
            }
        }
    }
}

/// Shuffle each class separately and carve off the validation fraction, so
/// both splits keep the original class balance. Every class keeps at least
/// one training sample.
fn stratified_split(
    labels: &[bool],
    validation_split: f64,
    rng: &mut StdRng,
) -> (Vec<usize>, Vec<usize>) {
    let mut train = Vec::new();
    let mut test = Vec::new();

    for class in [false, true] {
        let mut members: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == class)
            .map(|(index, _)| index)
            .collect();
        members.shuffle(rng);

        let mut held_out = (members.len() as f64 * validation_split).round() as usize;
        held_out = held_out.min(members.len().saturating_sub(1));

        test.extend(members.drain(..held_out));
        train.extend(members);
    }

    (train, test)
}

/// Round-robin stratified folds; mean accuracy across folds where the fold
/// assembly leaves both classes in the training portion.
fn cross_validate(
    rows: &[Vec<f64>],
    labels: &[bool],
    options: &TrainingOptions,
    candidate: Candidate,
    rng: &mut StdRng,
) -> f64 {
    let mut fold_of = vec![0usize; labels.len()];
    for class in [false, true] {
        let mut members: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == class)
            .map(|(index, _)| index)
            .collect();
        members.shuffle(rng);
        for (position, index) in members.into_iter().enumerate() {
            fold_of[index] = position % CV_FOLDS;
        }
    }

    let mut accuracies = Vec::new();
    for fold in 0..CV_FOLDS {
        let mut fit_rows = Vec::new();
        let mut fit_labels = Vec::new();
        let mut eval_rows = Vec::new();
        let mut eval_labels = Vec::new();

        for index in 0..labels.len() {
            if fold_of[index] == fold {
                eval_rows.push(rows[index].clone());
                eval_labels.push(labels[index]);
            } else {
                fit_rows.push(rows[index].clone());
                fit_labels.push(labels[index]);
            }
        }

        if eval_rows.is_empty()
            || fit_labels.iter().all(|&label| label)
            || fit_labels.iter().all(|&label| !label)
        {
            continue;
        }

        let model = candidate.fit(&fit_rows, &fit_labels, options, rng);
        let correct = eval_rows
            .iter()
            .zip(&eval_labels)
            .filter(|(row, &label)| (model.predict_proba(row) >= 0.5) == label)
            .count();
        accuracies.push(correct as f64 / eval_rows.len() as f64);
    }

    if accuracies.is_empty() {
        0.0
    } else {
        accuracies.iter().sum::<f64>() / accuracies.len() as f64
    }
}

fn confusion(labels: &[bool], predictions: &[bool]) -> ConfusionMatrix {
    let mut matrix = ConfusionMatrix::default();
    for (&label, &prediction) in labels.iter().zip(predictions) {
        match (label, prediction) {
            (false, false) => matrix.true_negatives += 1,
            (false, true) => matrix.false_positives += 1,
            (true, false) => matrix.false_negatives += 1,
            (true, true) => matrix.true_positives += 1,
        }
    }
    matrix
}

fn accuracy_from_confusion(matrix: &ConfusionMatrix) -> f64 {
    let correct = matrix.true_positives + matrix.true_negatives;
    let total = correct + matrix.false_positives + matrix.false_negatives;
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}

fn classification_report(matrix: &ConfusionMatrix) -> ClassificationReport {
    ClassificationReport {
        adopted: class_metrics(
            matrix.true_positives,
            matrix.false_positives,
            matrix.false_negatives,
        ),
        rejected: class_metrics(
            matrix.true_negatives,
            matrix.false_negatives,
            matrix.false_positives,
        ),
    }
}

fn class_metrics(true_hits: usize, false_hits: usize, misses: usize) -> ClassMetrics {
    let precision = ratio(true_hits, true_hits + false_hits);
    let recall = ratio(true_hits, true_hits + misses);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    ClassMetrics {
        precision,
        recall,
        f1,
        support: true_hits + misses,
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
