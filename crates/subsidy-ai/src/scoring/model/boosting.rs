use rand::Rng;
use serde::{Deserialize, Serialize};

use super::tree::{Criterion, DecisionTree, TreeParams};

/// Gradient boosting for binary log-loss: shallow regression trees fitted to
/// the residuals of the running logit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingClassifier {
    init_score: f64,
    learning_rate: f64,
    trees: Vec<DecisionTree>,
    dimensions: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct BoostingParams {
    pub stages: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    pub min_samples_split: usize,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            stages: 100,
            learning_rate: 0.1,
            max_depth: 6,
            min_samples_split: 2,
        }
    }
}

impl GradientBoostingClassifier {
    pub fn fit<R: Rng>(
        rows: &[Vec<f64>],
        labels: &[bool],
        params: BoostingParams,
        rng: &mut R,
    ) -> Self {
        let dimensions = rows.first().map(|row| row.len()).unwrap_or(0);
        let targets: Vec<f64> = labels.iter().map(|&label| f64::from(u8::from(label))).collect();
        let weights = vec![1.0; rows.len()];
        let indices: Vec<usize> = (0..rows.len()).collect();

        // Start from the log-odds of the base rate, clamped away from the
        // degenerate single-class endpoints.
        let base_rate = (targets.iter().sum::<f64>() / targets.len().max(1) as f64)
            .clamp(1e-6, 1.0 - 1e-6);
        let init_score = (base_rate / (1.0 - base_rate)).ln();

        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            feature_subsample: None,
        };

        let mut scores = vec![init_score; rows.len()];
        let mut trees = Vec::with_capacity(params.stages);
        let mut residuals = vec![0.0; rows.len()];

        for _ in 0..params.stages {
            for (slot, (&target, &score)) in residuals
                .iter_mut()
                .zip(targets.iter().zip(scores.iter()))
            {
                *slot = target - sigmoid(score);
            }

            let tree = DecisionTree::fit(
                rows,
                &residuals,
                &weights,
                &indices,
                Criterion::Variance,
                tree_params,
                rng,
            );

            for (score, row) in scores.iter_mut().zip(rows) {
                *score += params.learning_rate * tree.predict(row);
            }
            trees.push(tree);
        }

        Self {
            init_score,
            learning_rate: params.learning_rate,
            trees,
            dimensions,
        }
    }

    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        let mut score = self.init_score;
        for tree in &self.trees {
            score += self.learning_rate * tree.predict(row);
        }
        sigmoid(score)
    }

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

fn sigmoid(score: f64) -> f64 {
    1.0 / (1.0 + (-score).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn boosting_separates_classes() {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for step in 0..15 {
            let offset = step as f64 * 0.02;
            rows.push(vec![0.1 + offset, 0.3]);
            labels.push(false);
            rows.push(vec![0.7 + offset, 0.8]);
            labels.push(true);
        }

        let mut rng = StdRng::seed_from_u64(42);
        let model = GradientBoostingClassifier::fit(
            &rows,
            &labels,
            BoostingParams {
                stages: 20,
                ..BoostingParams::default()
            },
            &mut rng,
        );

        assert!(model.predict_proba(&[0.12, 0.3]) < 0.5);
        assert!(model.predict_proba(&[0.8, 0.8]) > 0.5);
    }

    #[test]
    fn probabilities_stay_in_unit_interval() {
        let rows = vec![vec![0.0], vec![1.0], vec![0.2], vec![0.9]];
        let labels = vec![false, true, false, true];
        let mut rng = StdRng::seed_from_u64(1);
        let model = GradientBoostingClassifier::fit(
            &rows,
            &labels,
            BoostingParams {
                stages: 50,
                ..BoostingParams::default()
            },
            &mut rng,
        );

        for value in [-10.0, 0.0, 0.5, 10.0] {
            let proba = model.predict_proba(&[value]);
            assert!((0.0..=1.0).contains(&proba));
        }
    }
}
