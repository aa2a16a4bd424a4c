//! Per-cluster descriptive statistics in original (unscaled) units

use super::kmeans::ClusterAssignment;
use serde::Serialize;

/// Feature column order used throughout segmentation
pub const FEATURE_NAMES: [&str; 4] = ["age", "annual_income", "current_savings", "risk_score"];

/// Median with the even-length average convention; `None` for no values
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FeatureStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl FeatureStats {
    /// All zeros for an empty slice
    pub fn from_values(values: &[f64]) -> Self {
        let Some(median) = median(values) else {
            return Self::default();
        };
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self { mean, median, min, max }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterProfile {
    pub cluster: usize,
    pub count: usize,
    pub age: FeatureStats,
    pub annual_income: FeatureStats,
    pub current_savings: FeatureStats,
    pub risk_score: FeatureStats,
}

impl ClusterProfile {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// One profile per cluster id, computed over the raw feature rows
pub fn build_profiles(features: &[Vec<f64>], assignment: &ClusterAssignment) -> Vec<ClusterProfile> {
    (0..assignment.k())
        .map(|cluster| {
            let rows = assignment.rows_in(cluster);
            let column = |c: usize| -> FeatureStats {
                let values: Vec<f64> = rows.iter().map(|&i| features[i][c]).collect();
                FeatureStats::from_values(&values)
            };
            ClusterProfile {
                cluster,
                count: rows.len(),
                age: column(0),
                annual_income: column(1),
                current_savings: column(2),
                risk_score: column(3),
            }
        })
        .collect()
}
