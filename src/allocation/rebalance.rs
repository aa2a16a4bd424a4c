//! Drift between current and target mixes, and the trades that close it

use super::mix::{round_tenth, AllocationMix};
use log::debug;
use serde::{Deserialize, Serialize};

/// Percentage-point drift in stocks that triggers a rebalance
pub const DEFAULT_DRIFT_TOLERANCE: f64 = 5.0;
/// Smallest per-class delta (percentage points) worth trading
pub const MIN_TRADE_DELTA: f64 = 1.0;
/// Portfolio value assumed when the member's savings are unknown
pub const DEFAULT_PORTFOLIO_VALUE: f64 = 100_000.0;

/// Recommended minus current, per asset class, in percentage points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationDelta {
    pub stocks: f64,
    pub bonds: f64,
    pub cash: f64,
}

pub fn rebalance_deltas(current: &AllocationMix, recommended: &AllocationMix) -> AllocationDelta {
    AllocationDelta {
        stocks: round_tenth(recommended.stocks - current.stocks),
        bonds: round_tenth(recommended.bonds - current.bonds),
        cash: round_tenth(recommended.cash - current.cash),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RebalanceAction {
    IncreaseEquity,
    DecreaseEquity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub asset_class: &'static str,
    pub side: TradeSide,
    /// Currency amount, rounded to whole units
    pub amount: f64,
    /// Absolute delta in percentage points
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RebalancePlan {
    pub current: AllocationMix,
    pub target: AllocationMix,
    pub deltas: AllocationDelta,
    pub drift_tolerance: f64,
    pub needs_rebalancing: bool,
    pub action: Option<RebalanceAction>,
    pub trades: Vec<Trade>,
}

/// Compare current and target mixes and size the trades for a portfolio
///
/// Rebalancing is needed only when the stock delta exceeds the tolerance;
/// trades are then listed for stocks and bonds, cash absorbing the rest.
pub fn plan_rebalance(
    portfolio_value: Option<f64>,
    current: AllocationMix,
    target: AllocationMix,
    drift_tolerance: f64,
) -> RebalancePlan {
    let deltas = rebalance_deltas(&current, &target);
    let needs_rebalancing = deltas.stocks.abs() > drift_tolerance;

    let action = if !needs_rebalancing {
        None
    } else if deltas.stocks > 0.0 {
        Some(RebalanceAction::IncreaseEquity)
    } else {
        Some(RebalanceAction::DecreaseEquity)
    };

    let trades = if needs_rebalancing {
        let value = portfolio_value
            .filter(|v| *v > 0.0)
            .unwrap_or(DEFAULT_PORTFOLIO_VALUE);
        [("Stocks", deltas.stocks), ("Bonds", deltas.bonds)]
            .into_iter()
            .filter(|(_, delta)| delta.abs() > MIN_TRADE_DELTA)
            .map(|(asset_class, delta)| Trade {
                asset_class,
                side: if delta > 0.0 { TradeSide::Buy } else { TradeSide::Sell },
                amount: (delta.abs() / 100.0 * value).round(),
                percentage: delta.abs(),
            })
            .collect()
    } else {
        Vec::new()
    };

    debug!(
        "Rebalance: stocks delta {:.1} (tolerance {:.1}) -> {:?}, {} trades",
        deltas.stocks,
        drift_tolerance,
        action,
        trades.len()
    );

    RebalancePlan {
        current,
        target,
        deltas,
        drift_tolerance,
        needs_rebalancing,
        action,
        trades,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_deltas() {
        let current = AllocationMix::new(20.0, 70.0, 10.0);
        let target = AllocationMix::new(52.0, 38.0, 10.0);
        let d = rebalance_deltas(&current, &target);
        assert_abs_diff_eq!(d.stocks, 32.0);
        assert_abs_diff_eq!(d.bonds, -32.0);
        assert_abs_diff_eq!(d.cash, 0.0);
    }

    #[test]
    fn test_plan_with_trades() {
        let plan = plan_rebalance(
            Some(200_000.0),
            AllocationMix::new(20.0, 70.0, 10.0),
            AllocationMix::new(52.0, 38.0, 10.0),
            DEFAULT_DRIFT_TOLERANCE,
        );
        assert!(plan.needs_rebalancing);
        assert_eq!(plan.action, Some(RebalanceAction::IncreaseEquity));
        assert_eq!(plan.trades.len(), 2);

        assert_eq!(plan.trades[0].asset_class, "Stocks");
        assert_eq!(plan.trades[0].side, TradeSide::Buy);
        assert_abs_diff_eq!(plan.trades[0].amount, 64_000.0);
        assert_eq!(plan.trades[1].side, TradeSide::Sell);
    }

    #[test]
    fn test_within_tolerance() {
        let plan = plan_rebalance(
            None,
            AllocationMix::new(50.0, 40.0, 10.0),
            AllocationMix::new(54.0, 36.0, 10.0),
            DEFAULT_DRIFT_TOLERANCE,
        );
        assert!(!plan.needs_rebalancing);
        assert!(plan.action.is_none());
        assert!(plan.trades.is_empty());
    }

    #[test]
    fn test_unknown_savings_use_default_value() {
        let plan = plan_rebalance(
            None,
            AllocationMix::new(70.0, 20.0, 10.0),
            AllocationMix::new(17.0, 63.0, 20.0),
            DEFAULT_DRIFT_TOLERANCE,
        );
        assert_eq!(plan.action, Some(RebalanceAction::DecreaseEquity));
        assert_abs_diff_eq!(plan.trades[0].amount, 53_000.0);
        assert_eq!(plan.trades[0].side, TradeSide::Sell);
    }
}
