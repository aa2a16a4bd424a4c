//! Contribution scenarios and savings-gap analysis
//!
//! Each scenario is projected year by year to retirement at the growth,
//! optimistic and pessimistic returns.

use crate::config::ProjectionAssumptions;
use crate::member::MemberRecord;
use crate::projection::{future_value, project};
use log::debug;
use serde::Serialize;

/// Share of income saved in the "10% Income Savings" scenario
pub const MODERATE_SAVINGS_RATE: f64 = 0.10;
/// Share of income saved in the "15% Income Savings" scenario
pub const AGGRESSIVE_SAVINGS_RATE: f64 = 0.15;

pub const STANDARD_401K_LIMIT: f64 = 23_000.0;
pub const CATCH_UP_401K_LIMIT: f64 = 7_500.0;
pub const STANDARD_IRA_LIMIT: f64 = 7_000.0;
pub const CATCH_UP_IRA_LIMIT: f64 = 1_000.0;
/// Age from which catch-up contributions are allowed
pub const CATCH_UP_AGE: u32 = 50;

/// Annual contribution limits for a member's age (2024 figures)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContributionLimits {
    pub standard_401k: f64,
    pub catch_up_401k: f64,
    pub standard_ira: f64,
    pub catch_up_ira: f64,
}

impl ContributionLimits {
    pub fn for_age(age: u32) -> Self {
        let catch_up = age >= CATCH_UP_AGE;
        Self {
            standard_401k: STANDARD_401K_LIMIT,
            catch_up_401k: if catch_up { CATCH_UP_401K_LIMIT } else { 0.0 },
            standard_ira: STANDARD_IRA_LIMIT,
            catch_up_ira: if catch_up { CATCH_UP_IRA_LIMIT } else { 0.0 },
        }
    }

    pub fn total_401k(&self) -> f64 {
        self.standard_401k + self.catch_up_401k
    }

    pub fn total_ira(&self) -> f64 {
        self.standard_ira + self.catch_up_ira
    }

    pub fn combined_max(&self) -> f64 {
        self.total_401k() + self.total_ira()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributionScenario {
    pub name: &'static str,
    pub annual_contribution: f64,
    pub monthly_contribution: f64,
    /// Balance at retirement at the growth return
    pub projected_value: f64,
    pub optimistic_value: f64,
    pub pessimistic_value: f64,
    /// Safe withdrawal from `projected_value` as a percentage of income
    pub income_replacement: Option<f64>,
}

impl ContributionScenario {
    fn new(
        name: &'static str,
        savings: f64,
        annual_contribution: f64,
        years: u32,
        income: Option<f64>,
        assumptions: &ProjectionAssumptions,
    ) -> Self {
        let value_at = |rate: f64| project(savings, annual_contribution, rate, years).final_balance();
        let projected_value = value_at(assumptions.growth_return);
        Self {
            name,
            annual_contribution,
            monthly_contribution: annual_contribution / 12.0,
            projected_value,
            optimistic_value: value_at(assumptions.optimistic_return),
            pessimistic_value: value_at(assumptions.pessimistic_return),
            income_replacement: income_replacement(projected_value, income, assumptions.safe_withdrawal_rate),
        }
    }
}

fn income_replacement(value: f64, income: Option<f64>, safe_rate: f64) -> Option<f64> {
    income
        .filter(|&i| i > 0.0)
        .map(|i| value * safe_rate / i * 100.0)
}

/// Distance of the current trajectory from the savings goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ContributionGap {
    Retired { withdrawal_capacity: f64 },
    OnTrack { surplus: f64 },
    Shortfall { gap: f64, additional_annual_contribution: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributionPlan {
    pub member_id: String,
    pub years_to_retirement: u32,
    /// Savings goal: income times the target multiple
    pub retirement_goal: f64,
    /// Limits at the member's current age; `None` when the age is unknown
    pub limits: Option<ContributionLimits>,
    pub scenarios: Vec<ContributionScenario>,
    /// Cheapest scenario contribution reaching the goal, else the largest
    pub recommended_contribution: f64,
    pub gap: ContributionGap,
}

/// Build contribution scenarios for a member
///
/// The retirement age falls back to the configured default when the member
/// has no goal. Members of unknown age, or already past their retirement age,
/// get the single "Current Portfolio" view.
pub fn recommend_contributions(member: &MemberRecord, assumptions: &ProjectionAssumptions) -> ContributionPlan {
    let savings = member.current_savings.unwrap_or(0.0);
    let retirement_age = member.retirement_age_goal.unwrap_or(assumptions.default_retirement_age);
    let years = member
        .age
        .map(|age| retirement_age.saturating_sub(age))
        .unwrap_or(0);
    let income = member.annual_income;
    let retirement_goal = income.unwrap_or(0.0) * assumptions.target_income_multiple;
    let limits = member.age.map(ContributionLimits::for_age);

    if years == 0 {
        let current = ContributionScenario::new("Current Portfolio", savings, 0.0, 0, income, assumptions);
        return ContributionPlan {
            member_id: member.member_id.clone(),
            years_to_retirement: 0,
            retirement_goal,
            limits,
            scenarios: vec![current],
            recommended_contribution: 0.0,
            gap: ContributionGap::Retired {
                withdrawal_capacity: savings * assumptions.safe_withdrawal_rate,
            },
        };
    }

    let annual_income = income.unwrap_or(0.0);
    let status_quo = member.contribution_amount.unwrap_or(0.0);
    let max_401k = limits.map(|l| l.total_401k()).unwrap_or(STANDARD_401K_LIMIT);
    let scenarios: Vec<ContributionScenario> = [
        ("Status Quo", status_quo),
        ("10% Income Savings", annual_income * MODERATE_SAVINGS_RATE),
        ("15% Income Savings", annual_income * AGGRESSIVE_SAVINGS_RATE),
        ("Maximum 401(k)", max_401k),
    ]
    .into_iter()
    .map(|(name, contribution)| ContributionScenario::new(name, savings, contribution, years, income, assumptions))
    .collect();

    let recommended_contribution = scenarios
        .iter()
        .filter(|s| s.projected_value >= retirement_goal)
        .map(|s| s.annual_contribution)
        .min_by(f64::total_cmp)
        .or_else(|| scenarios.iter().map(|s| s.annual_contribution).max_by(f64::total_cmp))
        .unwrap_or(0.0);

    let gap = contribution_gap(scenarios[0].projected_value, retirement_goal, assumptions.growth_return, years);
    debug!(
        "Member {}: {} years to retirement, recommended contribution {:.2}",
        member.member_id, years, recommended_contribution
    );

    ContributionPlan {
        member_id: member.member_id.clone(),
        years_to_retirement: years,
        retirement_goal,
        limits,
        scenarios,
        recommended_contribution,
        gap,
    }
}

/// Extra level annual contribution that closes the gap by retirement
fn contribution_gap(projected: f64, goal: f64, rate: f64, years: u32) -> ContributionGap {
    let gap = goal - projected;
    if gap <= 0.0 {
        return ContributionGap::OnTrack { surplus: -gap };
    }
    let annuity_factor = future_value(0.0, 1.0, rate, years);
    ContributionGap::Shortfall {
        gap,
        additional_annual_contribution: gap / annuity_factor,
    }
}
