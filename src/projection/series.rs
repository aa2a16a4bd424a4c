//! Yearly projection output structures

use serde::{Deserialize, Serialize};

/// A single projected year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    /// Projection year (1-indexed)
    pub year: u32,

    /// Balance carried in from the prior year
    pub opening_balance: f64,

    /// Investment growth credited this year
    pub growth: f64,

    /// Contribution (positive) or withdrawal (negative) applied this year
    pub contribution: f64,

    /// End-of-year balance; floored at 0 in the year a drawdown is exhausted
    pub balance: f64,
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSeries {
    /// Balance at year 0
    pub initial_balance: f64,

    /// Annual growth rate used
    pub annual_rate: f64,

    /// Yearly rows, in order
    pub points: Vec<ProjectionPoint>,

    /// Year in which a drawdown exhausted the balance, if it did
    pub depleted_in_year: Option<u32>,
}

impl ProjectionSeries {
    pub fn new(initial_balance: f64, annual_rate: f64) -> Self {
        Self {
            initial_balance,
            annual_rate,
            points: Vec::new(),
            depleted_in_year: None,
        }
    }

    pub fn add_point(&mut self, point: ProjectionPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Balance at the end of the last projected year, or the initial balance if none
    pub fn final_balance(&self) -> f64 {
        self.points
            .last()
            .map(|p| p.balance)
            .unwrap_or(self.initial_balance)
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        ProjectionSummary {
            years: self.points.len() as u32,
            initial_balance: self.initial_balance,
            final_balance: self.final_balance(),
            total_contributions: self.points.iter().map(|p| p.contribution).sum(),
            total_growth: self.points.iter().map(|p| p.growth).sum(),
            depleted_in_year: self.depleted_in_year,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub years: u32,
    pub initial_balance: f64,
    pub final_balance: f64,
    pub total_contributions: f64,
    pub total_growth: f64,
    pub depleted_in_year: Option<u32>,
}
