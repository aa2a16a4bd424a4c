//! What-if runner for member growth projections
//!
//! Holds the projection assumptions once and replays a member's plan under
//! adjusted market scenarios, contributions and retirement ages.

use crate::config::ProjectionAssumptions;
use crate::member::MemberRecord;
use crate::projection::{project, MarketScenario, ProjectionSeries};
use log::debug;
use serde::{Deserialize, Serialize};

/// Adjustments applied on top of a member's current plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatIfRequest {
    pub scenario: MarketScenario,
    pub inflation_adjusted: bool,
    /// Added to the yearly contribution; the result is floored at 0
    pub contribution_delta: f64,
    /// Years added to (or removed from) the retirement age
    pub retirement_age_delta: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhatIfResult {
    pub member_id: String,
    pub request: WhatIfRequest,
    /// Current plan at the scenario rate, without the deltas
    pub baseline: ProjectionSeries,
    pub scenario: ProjectionSeries,
    pub baseline_final: f64,
    pub scenario_final: f64,
    /// `scenario_final - baseline_final`
    pub difference: f64,
}

/// Pre-loaded runner for what-if projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// for scenario in [MarketScenario::Conservative, MarketScenario::Aggressive] {
///     let request = WhatIfRequest { scenario, ..WhatIfRequest::default() };
///     let result = runner.run(&member, &request);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    assumptions: ProjectionAssumptions,
}

impl ScenarioRunner {
    /// Create runner with the default assumptions
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assumptions(assumptions: ProjectionAssumptions) -> Self {
        Self { assumptions }
    }

    /// Years of growth until `retirement_age`, at least 1
    ///
    /// A member of unknown age is projected for a single year.
    fn horizon(member: &MemberRecord, retirement_age: u32) -> u32 {
        member
            .age
            .map(|age| retirement_age.saturating_sub(age))
            .unwrap_or(0)
            .max(1)
    }

    /// Project the current plan and the adjusted plan side by side
    ///
    /// Both run at the scenario rate, so `difference` isolates the
    /// contribution and retirement-age deltas.
    pub fn run(&self, member: &MemberRecord, request: &WhatIfRequest) -> WhatIfResult {
        let savings = member.current_savings.unwrap_or(0.0);
        let contribution = member.contribution_amount.unwrap_or(0.0);
        let retirement_age = member
            .retirement_age_goal
            .unwrap_or(self.assumptions.default_retirement_age);
        let scenario_rate = request.scenario.annual_rate(request.inflation_adjusted);

        let baseline_years = Self::horizon(member, retirement_age);
        let baseline = project(savings, contribution, scenario_rate, baseline_years);

        let adjusted_age = retirement_age.saturating_add_signed(request.retirement_age_delta);
        let scenario_years = Self::horizon(member, adjusted_age);
        let scenario_contribution = (contribution + request.contribution_delta).max(0.0);
        let scenario = project(savings, scenario_contribution, scenario_rate, scenario_years);

        debug!(
            "What-if for {}: {} at {:.3} over {} years (baseline {} years)",
            member.member_id,
            request.scenario.as_str(),
            scenario_rate,
            scenario_years,
            baseline_years
        );

        let baseline_final = baseline.final_balance();
        let scenario_final = scenario.final_balance();
        WhatIfResult {
            member_id: member.member_id.clone(),
            request: *request,
            baseline,
            scenario,
            baseline_final,
            scenario_final,
            difference: scenario_final - baseline_final,
        }
    }

    /// Run several requests against the same member
    pub fn run_scenarios(&self, member: &MemberRecord, requests: &[WhatIfRequest]) -> Vec<WhatIfResult> {
        requests.iter().map(|r| self.run(member, r)).collect()
    }
}

/// One-off what-if projection
pub fn what_if(member: &MemberRecord, request: &WhatIfRequest, assumptions: &ProjectionAssumptions) -> WhatIfResult {
    ScenarioRunner::with_assumptions(assumptions.clone()).run(member, request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::future_value;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn member() -> MemberRecord {
        MemberRecord {
            age: Some(45),
            retirement_age_goal: Some(65),
            current_savings: Some(100_000.0),
            contribution_amount: Some(5_000.0),
            ..MemberRecord::new("W1")
        }
    }

    #[test]
    fn test_default_request_uses_moderate_rate() {
        let result = ScenarioRunner::new().run(&member(), &WhatIfRequest::default());

        assert_eq!(result.baseline.len(), 20);
        assert_eq!(result.scenario.len(), 20);
        assert_abs_diff_eq!(result.scenario.annual_rate, 0.06, epsilon = 1e-12);
        assert_relative_eq!(
            result.scenario_final,
            future_value(100_000.0, 5_000.0, 0.06, 20),
            max_relative = 1e-10
        );
        // No deltas: baseline and scenario are the same plan
        assert_eq!(result.baseline.annual_rate, result.scenario.annual_rate);
        assert_eq!(result.difference, 0.0);
    }

    #[test]
    fn test_baseline_follows_scenario_rate() {
        let request = WhatIfRequest {
            scenario: MarketScenario::Conservative,
            contribution_delta: 1_000.0,
            ..WhatIfRequest::default()
        };
        let result = ScenarioRunner::new().run(&member(), &request);

        assert_abs_diff_eq!(result.baseline.annual_rate, 0.04, epsilon = 1e-12);
        // Only the extra 1k a year separates the two plans
        assert_relative_eq!(result.difference, future_value(0.0, 1_000.0, 0.04, 20), max_relative = 1e-10);
    }

    #[test]
    fn test_inflation_adjustment() {
        let request = WhatIfRequest {
            scenario: MarketScenario::Aggressive,
            inflation_adjusted: true,
            ..WhatIfRequest::default()
        };
        let result = what_if(&member(), &request, &ProjectionAssumptions::default());
        assert_abs_diff_eq!(result.scenario.annual_rate, 0.06, epsilon = 1e-12);
        assert_abs_diff_eq!(result.baseline.annual_rate, 0.06, epsilon = 1e-12);
    }

    #[test]
    fn test_delayed_retirement_and_extra_contribution() {
        let request = WhatIfRequest {
            scenario: MarketScenario::Conservative,
            inflation_adjusted: false,
            contribution_delta: 1_000.0,
            retirement_age_delta: 2,
        };
        let result = ScenarioRunner::new().run(&member(), &request);

        assert_eq!(result.scenario.len(), 22);
        assert_abs_diff_eq!(result.scenario.points[0].contribution, 6_000.0);
    }

    #[test]
    fn test_horizon_floor_and_contribution_floor() {
        let mut retired = member();
        retired.age = Some(70);
        let request = WhatIfRequest {
            contribution_delta: -10_000.0,
            retirement_age_delta: -3,
            ..WhatIfRequest::default()
        };
        let result = ScenarioRunner::new().run(&retired, &request);

        assert_eq!(result.baseline.len(), 1);
        assert_eq!(result.scenario.len(), 1);
        assert_eq!(result.scenario.points[0].contribution, 0.0);
        assert_eq!(result.scenario.depleted_in_year, None);
    }

    #[test]
    fn test_run_scenarios() {
        let requests: Vec<WhatIfRequest> = [MarketScenario::Conservative, MarketScenario::Aggressive]
            .into_iter()
            .map(|scenario| WhatIfRequest { scenario, ..WhatIfRequest::default() })
            .collect();
        let results = ScenarioRunner::new().run_scenarios(&member(), &requests);

        assert_eq!(results.len(), 2);
        assert!(results[0].scenario_final < results[1].scenario_final);
    }
}
