use serde::{Deserialize, Serialize};

/// Per-column standardization fitted on the training split only.
///
/// Columns with zero variance pass through centered but unscaled, matching
/// the usual convention so constant features cannot produce NaNs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let dimensions = rows.first().map(|row| row.len()).unwrap_or(0);
        let count = rows.len().max(1) as f64;

        let mut mean = vec![0.0; dimensions];
        for row in rows {
            for (column, value) in row.iter().enumerate() {
                mean[column] += value;
            }
        }
        for value in &mut mean {
            *value /= count;
        }

        let mut std = vec![0.0; dimensions];
        for row in rows {
            for (column, value) in row.iter().enumerate() {
                let centered = value - mean[column];
                std[column] += centered * centered;
            }
        }
        for value in &mut std {
            *value = (*value / count).sqrt();
            if *value <= f64::EPSILON {
                *value = 1.0;
            }
        }

        Self { mean, std }
    }

    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .enumerate()
            .map(|(column, value)| {
                let mean = self.mean.get(column).copied().unwrap_or(0.0);
                let std = self.std.get(column).copied().unwrap_or(1.0);
                (value - mean) / std
            })
            .collect()
    }

    pub fn transform_all(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter().map(|row| self.transform(row)).collect()
    }
}
