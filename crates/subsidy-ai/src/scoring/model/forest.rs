use rand::Rng;
use serde::{Deserialize, Serialize};

use super::tree::{Criterion, DecisionTree, TreeParams};

/// Bagged ensemble of gini trees with √d feature subsampling per split and
/// class-balanced sample weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTree>,
    dimensions: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct ForestParams {
    pub trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            trees: 100,
            max_depth: 10,
            min_samples_split: 2,
        }
    }
}

impl RandomForestClassifier {
    /// Fit on binary labels. Sample weights are balanced so the minority
    /// class carries the same total weight as the majority class.
    pub fn fit<R: Rng>(rows: &[Vec<f64>], labels: &[bool], params: ForestParams, rng: &mut R) -> Self {
        let dimensions = rows.first().map(|row| row.len()).unwrap_or(0);
        let targets: Vec<f64> = labels.iter().map(|&label| f64::from(u8::from(label))).collect();
        let weights = balanced_weights(labels);
        let feature_subsample = ((dimensions as f64).sqrt().ceil() as usize).max(1);

        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            feature_subsample: Some(feature_subsample.min(dimensions.max(1))),
        };

        let mut trees = Vec::with_capacity(params.trees);
        for _ in 0..params.trees {
            let indices: Vec<usize> = (0..rows.len())
                .map(|_| rng.gen_range(0..rows.len()))
                .collect();
            trees.push(DecisionTree::fit(
                rows,
                &targets,
                &weights,
                &indices,
                Criterion::Gini,
                tree_params,
                rng,
            ));
        }

        Self { trees, dimensions }
    }

    /// Probability of the positive (adopted) class: mean of the per-tree
    /// leaf fractions.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.5;
        }
        let total: f64 = self.trees.iter().map(|tree| tree.predict(row)).sum();
        (total / self.trees.len() as f64).clamp(0.0, 1.0)
    }

    /// Impurity-decrease importances accumulated over all trees, normalized
    /// to sum to one when any split was made.
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut importances = vec![0.0; self.dimensions];
        for tree in &self.trees {
            for (column, value) in tree.importances.iter().enumerate() {
                importances[column] += value;
            }
        }
        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for value in &mut importances {
                *value /= total;
            }
        }
        importances
    }
}

fn balanced_weights(labels: &[bool]) -> Vec<f64> {
    let total = labels.len() as f64;
    let positives = labels.iter().filter(|&&label| label).count() as f64;
    let negatives = total - positives;

    labels
        .iter()
        .map(|&label| {
            if label {
                if positives > 0.0 {
                    total / (2.0 * positives)
                } else {
                    1.0
                }
            } else if negatives > 0.0 {
                total / (2.0 * negatives)
            } else {
                1.0
            }
        })
        .collect()
}
