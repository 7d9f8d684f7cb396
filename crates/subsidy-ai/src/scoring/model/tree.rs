use rand::seq::index::sample;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Flat-array CART node. Children reference positions in the owning tree's
/// node vector, which keeps the structure serde-friendly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Impurity criterion selecting between classification and regression growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Criterion {
    /// Weighted binary gini; leaf value is the weighted positive fraction.
    Gini,
    /// Weighted variance; leaf value is the weighted mean target.
    Variance,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    /// Candidate features considered per split. `None` considers all.
    pub feature_subsample: Option<usize>,
}

/// Depth-limited decision tree shared by the forest and boosting ensembles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct DecisionTree {
    nodes: Vec<Node>,
    /// Total weighted impurity decrease attributed to each feature.
    pub(crate) importances: Vec<f64>,
}

impl DecisionTree {
    pub(crate) fn fit<R: Rng>(
        rows: &[Vec<f64>],
        targets: &[f64],
        weights: &[f64],
        indices: &[usize],
        criterion: Criterion,
        params: TreeParams,
        rng: &mut R,
    ) -> Self {
        let dimensions = rows.first().map(|row| row.len()).unwrap_or(0);
        let mut tree = Self {
            nodes: Vec::new(),
            importances: vec![0.0; dimensions],
        };
        let mut indices = indices.to_vec();
        tree.grow(rows, targets, weights, &mut indices, criterion, params, 0, rng);
        tree
    }

    pub(crate) fn predict(&self, row: &[f64]) -> f64 {
        let mut at = 0;
        loop {
            match &self.nodes[at] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    at = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Grows the subtree for `indices`, returning the new node's position.
    #[allow(clippy::too_many_arguments)]
    fn grow<R: Rng>(
        &mut self,
        rows: &[Vec<f64>],
        targets: &[f64],
        weights: &[f64],
        indices: &mut [usize],
        criterion: Criterion,
        params: TreeParams,
        depth: usize,
        rng: &mut R,
    ) -> usize {
        let stats = NodeStats::collect(targets, weights, indices);

        let at_depth_limit = depth >= params.max_depth;
        let too_small = indices.len() < params.min_samples_split;
        if at_depth_limit || too_small || stats.impurity(criterion) <= f64::EPSILON {
            return self.push_leaf(stats.value());
        }

        let split = match best_split(rows, targets, weights, indices, criterion, params, rng) {
            Some(split) => split,
            None => return self.push_leaf(stats.value()),
        };

        self.importances[split.feature] += split.gain;

        // Partition in place so child nodes reuse the same index buffer.
        let mid = partition(rows, indices, split.feature, split.threshold);
        let at = self.nodes.len();
        self.nodes.push(Node::Leaf { value: 0.0 }); // placeholder until children exist

        let (left_indices, right_indices) = indices.split_at_mut(mid);
        let left = self.grow(
            rows, targets, weights, left_indices, criterion, params, depth + 1, rng,
        );
        let right = self.grow(
            rows, targets, weights, right_indices, criterion, params, depth + 1, rng,
        );

        self.nodes[at] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        at
    }

    fn push_leaf(&mut self, value: f64) -> usize {
        let at = self.nodes.len();
        self.nodes.push(Node::Leaf { value });
        at
    }
}

struct NodeStats {
    weight: f64,
    weighted_sum: f64,
    weighted_squares: f64,
}

impl NodeStats {
    fn collect(targets: &[f64], weights: &[f64], indices: &[usize]) -> Self {
        let mut stats = Self {
            weight: 0.0,
            weighted_sum: 0.0,
            weighted_squares: 0.0,
        };
        for &index in indices {
            stats.push(targets[index], weights[index]);
        }
        stats
    }

    fn push(&mut self, target: f64, weight: f64) {
        self.weight += weight;
        self.weighted_sum += weight * target;
        self.weighted_squares += weight * target * target;
    }

    fn remove(&mut self, target: f64, weight: f64) {
        self.weight -= weight;
        self.weighted_sum -= weight * target;
        self.weighted_squares -= weight * target * target;
    }

    fn value(&self) -> f64 {
        if self.weight > 0.0 {
            self.weighted_sum / self.weight
        } else {
            0.0
        }
    }

    fn impurity(&self, criterion: Criterion) -> f64 {
        if self.weight <= 0.0 {
            return 0.0;
        }
        match criterion {
            Criterion::Gini => {
                let p = (self.weighted_sum / self.weight).clamp(0.0, 1.0);
                2.0 * p * (1.0 - p)
            }
            Criterion::Variance => {
                let mean = self.weighted_sum / self.weight;
                (self.weighted_squares / self.weight - mean * mean).max(0.0)
            }
        }
    }
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

fn best_split<R: Rng>(
    rows: &[Vec<f64>],
    targets: &[f64],
    weights: &[f64],
    indices: &[usize],
    criterion: Criterion,
    params: TreeParams,
    rng: &mut R,
) -> Option<SplitCandidate> {
    let dimensions = rows.first().map(|row| row.len()).unwrap_or(0);
    if dimensions == 0 {
        return None;
    }

    let candidates: Vec<usize> = match params.feature_subsample {
        Some(count) if count < dimensions => {
            sample(rng, dimensions, count).into_iter().collect()
        }
        _ => (0..dimensions).collect(),
    };

    let parent = NodeStats::collect(targets, weights, indices);
    let parent_impurity = parent.impurity(criterion);
    let mut best: Option<SplitCandidate> = None;

    let mut ordered = indices.to_vec();
    for feature in candidates {
        ordered.sort_by(|&a, &b| {
            rows[a][feature]
                .partial_cmp(&rows[b][feature])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut left = NodeStats {
            weight: 0.0,
            weighted_sum: 0.0,
            weighted_squares: 0.0,
        };
        let mut right = NodeStats::collect(targets, weights, indices);

        for window in 0..ordered.len().saturating_sub(1) {
            let index = ordered[window];
            left.push(targets[index], weights[index]);
            right.remove(targets[index], weights[index]);

            let current = rows[index][feature];
            let next = rows[ordered[window + 1]][feature];
            if next <= current {
                continue;
            }

            let total = left.weight + right.weight;
            if total <= 0.0 {
                continue;
            }
            let children = (left.weight * left.impurity(criterion)
                + right.weight * right.impurity(criterion))
                / total;
            let gain = (parent_impurity - children) * total;
            if gain > best.as_ref().map(|split| split.gain).unwrap_or(1e-12) {
                best = Some(SplitCandidate {
                    feature,
                    threshold: (current + next) / 2.0,
                    gain,
                });
            }
        }
    }

    best
}

/// Moves rows at or below the threshold to the front; returns the boundary.
fn partition(rows: &[Vec<f64>], indices: &mut [usize], feature: usize, threshold: f64) -> usize {
    let mut boundary = 0;
    for position in 0..indices.len() {
        if rows[indices[position]][feature] <= threshold {
            indices.swap(boundary, position);
            boundary += 1;
        }
    }
    boundary
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rows() -> Vec<Vec<f64>> {
        vec![
            vec![0.1, 0.0],
            vec![0.2, 0.1],
            vec![0.3, 0.0],
            vec![0.8, 0.9],
            vec![0.9, 1.0],
            vec![0.7, 0.8],
        ]
    }

    #[test]
    fn separable_data_is_split_cleanly() {
        let rows = rows();
        let targets = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let weights = vec![1.0; 6];
        let indices: Vec<usize> = (0..6).collect();
        let mut rng = StdRng::seed_from_u64(7);

        let tree = DecisionTree::fit(
            &rows,
            &targets,
            &weights,
            &indices,
            Criterion::Gini,
            TreeParams {
                max_depth: 3,
                min_samples_split: 2,
                feature_subsample: None,
            },
            &mut rng,
        );

        assert!(tree.predict(&[0.15, 0.05]) < 0.5);
        assert!(tree.predict(&[0.85, 0.95]) > 0.5);
    }

    #[test]
    fn depth_zero_produces_single_leaf() {
        let rows = rows();
        let targets = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let weights = vec![1.0; 6];
        let indices: Vec<usize> = (0..6).collect();
        let mut rng = StdRng::seed_from_u64(7);

        let tree = DecisionTree::fit(
            &rows,
            &targets,
            &weights,
            &indices,
            Criterion::Gini,
            TreeParams {
                max_depth: 0,
                min_samples_split: 2,
                feature_subsample: None,
            },
            &mut rng,
        );

        let value = tree.predict(&[0.5, 0.5]);
        assert!((value - 0.5).abs() < 1e-9);
    }

    #[test]
    fn regression_leaves_hold_means() {
        let rows = rows();
        let targets = vec![1.0, 1.2, 0.8, -1.0, -1.2, -0.8];
        let weights = vec![1.0; 6];
        let indices: Vec<usize> = (0..6).collect();
        let mut rng = StdRng::seed_from_u64(7);

        let tree = DecisionTree::fit(
            &rows,
            &targets,
            &weights,
            &indices,
            Criterion::Variance,
            TreeParams {
                max_depth: 2,
                min_samples_split: 2,
                feature_subsample: None,
            },
            &mut rng,
        );

        assert!((tree.predict(&[0.2, 0.0]) - 1.0).abs() < 0.25);
        assert!((tree.predict(&[0.8, 0.9]) + 1.0).abs() < 0.25);
    }

    #[test]
    fn importances_name_the_informative_feature() {
        let rows = rows();
        let targets = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let weights = vec![1.0; 6];
        let indices: Vec<usize> = (0..6).collect();
        let mut rng = StdRng::seed_from_u64(7);

        let tree = DecisionTree::fit(
            &rows,
            &targets,
            &weights,
            &indices,
            Criterion::Gini,
            TreeParams {
                max_depth: 3,
                min_samples_split: 2,
                feature_subsample: None,
            },
            &mut rng,
        );

        assert!(tree.importances.iter().sum::<f64>() > 0.0);
    }
}
