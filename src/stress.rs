//! Sensitivity sweeps and stress tests around a member's current plan
//!
//! Every case is projected to retirement and compared with the current plan
//! grown at the configured growth return.

use crate::config::ProjectionAssumptions;
use crate::member::MemberRecord;
use crate::projection::project;
use log::debug;
use serde::Serialize;

/// Extra yearly contributions tried by the contribution sweep
pub const CONTRIBUTION_STEPS: [f64; 3] = [1_000.0, 2_000.0, 5_000.0];
/// Retirement-age shifts tried by the retirement sweep
pub const RETIREMENT_AGE_STEPS: [i32; 4] = [-2, -1, 1, 2];
/// Flat annual returns tried by the return sweep
pub const RETURN_RATE_STEPS: [f64; 5] = [0.05, 0.06, 0.07, 0.08, 0.09];

/// Equity and bond returns assumed for one market regime
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StressMarket {
    pub name: &'static str,
    pub equity_return: f64,
    pub bond_return: f64,
}

impl StressMarket {
    /// Portfolio return for an equity share in [0, 1]; the rest earns the bond return
    pub fn blended_return(&self, equity_share: f64) -> f64 {
        equity_share * self.equity_return + (1.0 - equity_share) * self.bond_return
    }
}

pub const STRESS_MARKETS: [StressMarket; 4] = [
    StressMarket { name: "Bull Market", equity_return: 0.12, bond_return: 0.05 },
    StressMarket { name: "Normal Market", equity_return: 0.08, bond_return: 0.04 },
    StressMarket { name: "Bear Market", equity_return: 0.03, bond_return: 0.03 },
    StressMarket { name: "Recession", equity_return: -0.05, bond_return: 0.02 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepKind {
    Contribution,
    RetirementAge,
    ReturnRate,
}

/// One varied input and its value at retirement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPoint {
    pub kind: SweepKind,
    pub label: String,
    pub annual_contribution: f64,
    pub retirement_age: u32,
    pub annual_rate: f64,
    pub years: u32,
    pub projected_value: f64,
    pub sustainable_withdrawal: f64,
    /// `projected_value` minus the current plan's value
    pub difference: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketStress {
    pub market: StressMarket,
    pub equity_share: f64,
    pub blended_return: f64,
    pub projected_value: f64,
    pub sustainable_withdrawal: f64,
    /// Percent change against the current plan; `None` when that plan is worth nothing
    pub vs_baseline_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InflationStress {
    pub inflation: f64,
    pub nominal_return: f64,
    pub real_return: f64,
    pub projected_value: f64,
    pub sustainable_withdrawal: f64,
}

/// Whether safe-rate withdrawals from the retirement pot, summed over a long
/// retirement, stay within the pot itself
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongevityStress {
    pub life_expectancy: u32,
    pub retirement_years: u32,
    pub projected_value: f64,
    pub annual_withdrawal: f64,
    pub total_withdrawals: f64,
    pub sufficient: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressReport {
    pub member_id: String,
    pub years_to_retirement: u32,
    /// Current plan at the growth return
    pub baseline_value: f64,
    pub sweeps: Vec<SweepPoint>,
    pub markets: Vec<MarketStress>,
    pub inflation: InflationStress,
    pub longevity: LongevityStress,
}

/// Savings, contribution and timing shared by every case
struct Plan {
    age: Option<u32>,
    savings: f64,
    contribution: f64,
    retirement_age: u32,
}

impl Plan {
    fn years_until(&self, retirement_age: u32) -> u32 {
        self.age.map(|age| retirement_age.saturating_sub(age)).unwrap_or(0)
    }

    fn value(&self, contribution: f64, rate: f64, years: u32) -> f64 {
        project(self.savings, contribution, rate, years).final_balance()
    }
}

/// Run the sweeps and stress tests for one member
///
/// A member of unknown age, or already past retirement, is valued at their
/// current savings throughout.
pub fn stress_test(member: &MemberRecord, assumptions: &ProjectionAssumptions) -> StressReport {
    let plan = Plan {
        age: member.age,
        savings: member.current_savings.unwrap_or(0.0),
        contribution: member.contribution_amount.unwrap_or(0.0),
        retirement_age: member
            .retirement_age_goal
            .unwrap_or(assumptions.default_retirement_age),
    };
    let years = plan.years_until(plan.retirement_age);
    let baseline_value = plan.value(plan.contribution, assumptions.growth_return, years);
    let safe_rate = assumptions.safe_withdrawal_rate;

    let sweeps = sweeps(&plan, assumptions, baseline_value);

    let equity_share = member.investment_kind().assumed_mix().equity_fraction();
    let markets = STRESS_MARKETS
        .iter()
        .map(|market| {
            let blended_return = market.blended_return(equity_share);
            let projected_value = plan.value(plan.contribution, blended_return, years);
            MarketStress {
                market: *market,
                equity_share,
                blended_return,
                projected_value,
                sustainable_withdrawal: projected_value * safe_rate,
                vs_baseline_pct: (baseline_value > 0.0)
                    .then(|| (projected_value / baseline_value - 1.0) * 100.0),
            }
        })
        .collect();

    let real_return = assumptions.growth_return - assumptions.stress_inflation;
    let inflated_value = plan.value(plan.contribution, real_return, years);
    let inflation = InflationStress {
        inflation: assumptions.stress_inflation,
        nominal_return: assumptions.growth_return,
        real_return,
        projected_value: inflated_value,
        sustainable_withdrawal: inflated_value * safe_rate,
    };

    let retirement_years = assumptions
        .longevity_stress_age
        .saturating_sub(plan.retirement_age);
    let annual_withdrawal = baseline_value * safe_rate;
    let total_withdrawals = annual_withdrawal * retirement_years as f64;
    let longevity = LongevityStress {
        life_expectancy: assumptions.longevity_stress_age,
        retirement_years,
        projected_value: baseline_value,
        annual_withdrawal,
        total_withdrawals,
        sufficient: total_withdrawals <= baseline_value,
    };

    debug!(
        "Stress test for {}: baseline {:.2} over {} years, longevity sufficient: {}",
        member.member_id, baseline_value, years, longevity.sufficient
    );

    StressReport {
        member_id: member.member_id.clone(),
        years_to_retirement: years,
        baseline_value,
        sweeps,
        markets,
        inflation,
        longevity,
    }
}

fn sweeps(plan: &Plan, assumptions: &ProjectionAssumptions, baseline_value: f64) -> Vec<SweepPoint> {
    let growth = assumptions.growth_return;
    let safe_rate = assumptions.safe_withdrawal_rate;
    let point = |kind: SweepKind, label: String, contribution: f64, retirement_age: u32, rate: f64| {
        let years = plan.years_until(retirement_age);
        let projected_value = plan.value(contribution, rate, years);
        SweepPoint {
            kind,
            label,
            annual_contribution: contribution,
            retirement_age,
            annual_rate: rate,
            years,
            projected_value,
            sustainable_withdrawal: projected_value * safe_rate,
            difference: projected_value - baseline_value,
        }
    };

    let mut points = Vec::with_capacity(
        CONTRIBUTION_STEPS.len() + RETIREMENT_AGE_STEPS.len() + RETURN_RATE_STEPS.len(),
    );
    for step in CONTRIBUTION_STEPS {
        points.push(point(
            SweepKind::Contribution,
            format!("Contribution +${:.0}", step),
            plan.contribution + step,
            plan.retirement_age,
            growth,
        ));
    }
    for step in RETIREMENT_AGE_STEPS {
        points.push(point(
            SweepKind::RetirementAge,
            format!("Retirement {:+} years", step),
            plan.contribution,
            plan.retirement_age.saturating_add_signed(step),
            growth,
        ));
    }
    for rate in RETURN_RATE_STEPS {
        points.push(point(
            SweepKind::ReturnRate,
            format!("{:.0}% Annual Return", rate * 100.0),
            plan.contribution,
            plan.retirement_age,
            rate,
        ));
    }
    points
}
