//! Retirement Analytics - quantitative engine for retirement plan members
//!
//! This library provides:
//! - Rule-based target allocation and rebalancing plans
//! - Compound-growth and drawdown projections with named market scenarios
//! - Withdrawal-rate risk classification and alerts
//! - Member segmentation with k-means clustering and labeled profiles
//! - Contribution scenarios and what-if comparisons
//! - Sensitivity sweeps and market, inflation and longevity stress tests

pub mod member;
pub mod allocation;
pub mod projection;
pub mod risk;
pub mod segmentation;
pub mod contribution;
pub mod scenario;
pub mod stress;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use member::{MemberRecord, RiskTolerance, load_members, find_member};
pub use allocation::{AllocationMix, recommend, recommend_for_member, estimate_current, plan_rebalance};
pub use projection::{project, future_value, ProjectionSeries, MarketScenario};
pub use risk::{classify, risk_alert, RiskStatus, RiskAlert};
pub use segmentation::{segment, SegmentationFilters, SegmentationResult, SegmentLabel};
pub use contribution::{recommend_contributions, ContributionPlan};
pub use scenario::{what_if, ScenarioRunner, WhatIfRequest, WhatIfResult};
pub use stress::{stress_test, StressReport};
pub use config::EngineConfig;
pub use error::{LoadError, SegmentationError, ConfigError};
