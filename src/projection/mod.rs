//! Compound-growth balance projections

mod engine;
mod series;
mod rates;

pub use engine::{project, future_value};
pub use series::{ProjectionPoint, ProjectionSeries, ProjectionSummary};
pub use rates::{
    MarketScenario, CONSERVATIVE_RATE, MODERATE_RATE, AGGRESSIVE_RATE, INFLATION_ADJUSTMENT,
};
