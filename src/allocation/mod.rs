//! Target allocation, current-mix estimation and rebalancing

mod mix;
mod recommender;
mod current;
mod rebalance;

pub use mix::{AllocationMix, DEFAULT_MIX};
pub use recommender::{
    recommend, recommend_for_member, recommend_with_trace, AllocationProfile,
    AllocationRecommendation,
};
pub use current::{estimate_current, resolve_current};
pub use rebalance::{
    plan_rebalance, rebalance_deltas, AllocationDelta, RebalanceAction, RebalancePlan, Trade,
    TradeSide, DEFAULT_DRIFT_TOLERANCE, DEFAULT_PORTFOLIO_VALUE, MIN_TRADE_DELTA,
};
