//! Column-wise z-score standardization

use crate::error::SegmentationError;
use serde::Serialize;

/// Column statistics fitted by [`standardize`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scaler {
    pub means: Vec<f64>,
    /// Population standard deviations; a zero column reports 0 here but divides by 1
    pub std_devs: Vec<f64>,
}

impl Scaler {
    fn divisor(&self, column: usize) -> f64 {
        let sd = self.std_devs[column];
        if sd == 0.0 {
            1.0
        } else {
            sd
        }
    }

    /// Map a standardized value back to its original units
    pub fn invert(&self, column: usize, z: f64) -> f64 {
        z * self.divisor(column) + self.means[column]
    }
}

/// Standardize each column to `(x - mean) / std`
pub fn standardize(rows: &[Vec<f64>]) -> Result<(Vec<Vec<f64>>, Scaler), SegmentationError> {
    let width = rows.first().map(Vec::len).ok_or(SegmentationError::EmptyInput)?;
    if width == 0 {
        return Err(SegmentationError::EmptyInput);
    }
    for (row, values) in rows.iter().enumerate() {
        if values.len() != width {
            return Err(SegmentationError::RaggedRow {
                row,
                expected: width,
                found: values.len(),
            });
        }
    }

    let n = rows.len() as f64;
    let means: Vec<f64> = (0..width)
        .map(|c| rows.iter().map(|r| r[c]).sum::<f64>() / n)
        .collect();
    let std_devs: Vec<f64> = (0..width)
        .map(|c| {
            let variance = rows.iter().map(|r| (r[c] - means[c]).powi(2)).sum::<f64>() / n;
            variance.sqrt()
        })
        .collect();

    let scaler = Scaler { means, std_devs };
    let scaled = rows
        .iter()
        .map(|r| {
            r.iter()
                .enumerate()
                .map(|(c, x)| (x - scaler.means[c]) / scaler.divisor(c))
                .collect()
        })
        .collect();

    Ok((scaled, scaler))
}
