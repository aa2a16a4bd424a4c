//! Deterministic compound-growth projector
//!
//! `balance[t] = balance[t-1] * (1 + rate) + contribution`, applied yearly.
//! A negative contribution is a fixed annual withdrawal: the run stops in
//! the first year the balance would reach zero, and that year is reported
//! with a zero balance.

use super::series::{ProjectionPoint, ProjectionSeries};
use log::debug;

/// Project a balance year by year
pub fn project(
    initial_balance: f64,
    yearly_contribution: f64,
    annual_rate: f64,
    horizon_years: u32,
) -> ProjectionSeries {
    let mut series = ProjectionSeries::new(initial_balance, annual_rate);
    let drawdown = yearly_contribution < 0.0;
    let mut balance = initial_balance;

    for year in 1..=horizon_years {
        let growth = balance * annual_rate;
        let next = balance + growth + yearly_contribution;

        if drawdown && next <= 0.0 {
            series.add_point(ProjectionPoint {
                year,
                opening_balance: balance,
                growth,
                contribution: yearly_contribution,
                balance: 0.0,
            });
            series.depleted_in_year = Some(year);
            debug!("Drawdown of {:.2}/yr exhausted balance in year {}", -yearly_contribution, year);
            break;
        }

        series.add_point(ProjectionPoint {
            year,
            opening_balance: balance,
            growth,
            contribution: yearly_contribution,
            balance: next,
        });
        balance = next;
    }

    series
}

/// Closed-form end balance of the same recurrence, for point estimates
///
/// No drawdown truncation is applied.
pub fn future_value(present_value: f64, yearly_contribution: f64, annual_rate: f64, years: u32) -> f64 {
    if years == 0 {
        return present_value;
    }
    let n = years as f64;
    if annual_rate.abs() < 1e-12 {
        return present_value + yearly_contribution * n;
    }
    let growth = (1.0 + annual_rate).powf(n);
    present_value * growth + yearly_contribution * (growth - 1.0) / annual_rate
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_drawdown_truncates_at_zero() {
        let series = project(100_000.0, -12_000.0, 0.0, 30);

        // 100k / 12k: year 8 leaves 4k, year 9 exhausts it
        assert_eq!(series.len(), 9);
        assert_eq!(series.depleted_in_year, Some(9));
        assert_abs_diff_eq!(series.points[7].balance, 4_000.0);
        assert_eq!(series.final_balance(), 0.0);
        assert!(series.points.iter().all(|p| p.balance >= 0.0));
    }

    #[test]
    fn test_drawdown_exact_exhaustion() {
        // Balance hits exactly zero in year 5
        let series = project(50_000.0, -10_000.0, 0.0, 30);
        assert_eq!(series.depleted_in_year, Some(5));
        assert_eq!(series.len(), 5);
    }

    #[test]
    fn test_drawdown_survives_horizon() {
        let series = project(1_000_000.0, -10_000.0, 0.0, 20);
        assert_eq!(series.len(), 20);
        assert_eq!(series.depleted_in_year, None);
        assert_abs_diff_eq!(series.final_balance(), 800_000.0);
    }

    #[test]
    fn test_growth_has_exact_horizon_and_increases() {
        let series = project(0.0, 6_000.0, 0.06, 25);
        assert_eq!(series.len(), 25);
        assert_eq!(series.points[0].year, 1);
        assert_abs_diff_eq!(series.points[0].balance, 6_000.0);
        for pair in series.points.windows(2) {
            assert!(pair[1].balance > pair[0].balance);
        }
        assert_relative_eq!(series.final_balance(), future_value(0.0, 6_000.0, 0.06, 25), max_relative = 1e-10);
    }

    #[test]
    fn test_negative_growth_is_not_truncated() {
        // Losses without withdrawals never truncate the series
        let series = project(1_000.0, 0.0, -0.5, 10);
        assert_eq!(series.len(), 10);
        assert_eq!(series.depleted_in_year, None);
    }

    #[test]
    fn test_zero_horizon() {
        let series = project(5_000.0, 1_000.0, 0.05, 0);
        assert!(series.is_empty());
        assert_eq!(series.final_balance(), 5_000.0);
    }

    #[test]
    fn test_future_value() {
        assert_abs_diff_eq!(future_value(10_000.0, 0.0, 0.10, 2), 12_100.0, epsilon = 1e-6);
        assert_abs_diff_eq!(future_value(10_000.0, 1_000.0, 0.0, 5), 15_000.0);
        assert_abs_diff_eq!(future_value(10_000.0, 1_000.0, 0.07, 0), 10_000.0);
    }

    #[test]
    fn test_summary() {
        let summary = project(1_000.0, 100.0, 0.0, 3).summary();
        assert_eq!(summary.years, 3);
        assert_abs_diff_eq!(summary.total_contributions, 300.0);
        assert_abs_diff_eq!(summary.final_balance, 1_300.0);
    }
}
