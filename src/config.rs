//! Engine configuration with built-in defaults and optional JSON overrides
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "segmentation": { "clusters": 5, "backend": "fixed_iteration" } }
//! ```

use crate::allocation::DEFAULT_DRIFT_TOLERANCE;
use crate::error::ConfigError;
use crate::risk::SAFE_WITHDRAWAL_RATE;
use crate::segmentation::ClusteringBackend;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Nominal return used for baseline projections
pub const DEFAULT_GROWTH_RETURN: f64 = 0.07;
pub const DEFAULT_OPTIMISTIC_RETURN: f64 = 0.09;
pub const DEFAULT_PESSIMISTIC_RETURN: f64 = 0.05;
/// Years simulated by the risk-alert drawdown
pub const DEFAULT_DRAWDOWN_YEARS: u32 = 30;
/// Life expectancy assumed by the longevity stress test
pub const DEFAULT_LONGEVITY_STRESS_AGE: u32 = 95;
/// Highest inflation rate assumed by the inflation stress test
pub const DEFAULT_STRESS_INFLATION: f64 = 0.035;
/// Retirement savings goal as a multiple of annual income
pub const DEFAULT_TARGET_INCOME_MULTIPLE: f64 = 10.0;
/// Retirement age assumed when a member has none recorded
pub const DEFAULT_RETIREMENT_AGE: u32 = 65;

pub const DEFAULT_CLUSTERS: usize = 4;
pub const DEFAULT_MAX_ITERATIONS: usize = 100;
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub segmentation: SegmentationConfig,
    pub projection: ProjectionAssumptions,
    pub rebalance: RebalanceConfig,
}

impl EngineConfig {
    /// Load overrides from a JSON file; missing fields keep their defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    pub backend: ClusteringBackend,
    pub clusters: usize,
    /// Iteration cap for the Lloyd backend; the fixed-iteration backend ignores it
    pub max_iterations: usize,
    pub seed: u64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            backend: ClusteringBackend::default(),
            clusters: DEFAULT_CLUSTERS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionAssumptions {
    pub growth_return: f64,
    pub optimistic_return: f64,
    pub pessimistic_return: f64,
    pub safe_withdrawal_rate: f64,
    pub drawdown_years: u32,
    pub longevity_stress_age: u32,
    pub stress_inflation: f64,
    pub target_income_multiple: f64,
    pub default_retirement_age: u32,
}

impl Default for ProjectionAssumptions {
    fn default() -> Self {
        Self {
            growth_return: DEFAULT_GROWTH_RETURN,
            optimistic_return: DEFAULT_OPTIMISTIC_RETURN,
            pessimistic_return: DEFAULT_PESSIMISTIC_RETURN,
            safe_withdrawal_rate: SAFE_WITHDRAWAL_RATE,
            drawdown_years: DEFAULT_DRAWDOWN_YEARS,
            longevity_stress_age: DEFAULT_LONGEVITY_STRESS_AGE,
            stress_inflation: DEFAULT_STRESS_INFLATION,
            target_income_multiple: DEFAULT_TARGET_INCOME_MULTIPLE,
            default_retirement_age: DEFAULT_RETIREMENT_AGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebalanceConfig {
    /// Stock drift, in percentage points, that triggers a rebalance
    pub drift_tolerance: f64,
}

impl Default for RebalanceConfig {
    fn default() -> Self {
        Self {
            drift_tolerance: DEFAULT_DRIFT_TOLERANCE,
        }
    }
}
