//! Rule-based target allocation (heuristic glide path)
//!
//! The equity fraction starts from a per-risk baseline and is pushed through
//! an ordered table of rules. Each rule is a named predicate/effect pair so
//! the precedence can be read straight off `EQUITY_RULES` and each tilt can
//! be tested on its own.

use super::mix::AllocationMix;
use crate::member::{MemberRecord, PensionKind, RiskTolerance, WithdrawalStyle};
use log::debug;
use serde::Serialize;

/// Age at which the glide path starts reducing equity
pub const GLIDE_START_AGE: f64 = 30.0;
/// Equity reduction per year of age past `GLIDE_START_AGE`
pub const GLIDE_SLOPE: f64 = 0.005;
/// Equity tilt applied by withdrawal-strategy and pension-type rules
pub const STRATEGY_TILT: f64 = 0.03;
/// Equity cut when retirement is close
pub const NEAR_RETIREMENT_CUT: f64 = 0.05;
/// Years-to-goal threshold for the near-retirement cut (inclusive)
pub const NEAR_RETIREMENT_YEARS: u32 = 7;

/// Inputs to the allocation rules, already normalised from free text
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AllocationProfile {
    pub age: Option<u32>,
    pub risk_tolerance: RiskTolerance,
    pub pension: PensionKind,
    pub withdrawal: WithdrawalStyle,
    pub retirement_age_goal: Option<u32>,
}

impl AllocationProfile {
    /// Normalise raw labels once at the boundary
    pub fn new(
        age: Option<u32>,
        risk_tolerance: &str,
        pension_type: &str,
        withdrawal_strategy: &str,
        retirement_age_goal: Option<u32>,
    ) -> Self {
        Self {
            age,
            risk_tolerance: RiskTolerance::parse(risk_tolerance),
            pension: PensionKind::classify(pension_type),
            withdrawal: WithdrawalStyle::classify(withdrawal_strategy),
            retirement_age_goal,
        }
    }

    pub fn from_member(member: &MemberRecord) -> Self {
        Self {
            age: member.age,
            risk_tolerance: member.risk_tolerance,
            pension: member.pension_kind(),
            withdrawal: member.withdrawal_style(),
            retirement_age_goal: member.retirement_age_goal,
        }
    }

    fn years_to_retirement(&self) -> Option<u32> {
        match (self.age, self.retirement_age_goal) {
            (Some(age), Some(goal)) => Some(goal.saturating_sub(age)),
            _ => None,
        }
    }
}

/// One step of the equity decision table
struct EquityRule {
    name: &'static str,
    applies: fn(&AllocationProfile) -> bool,
    effect: fn(f64, &AllocationProfile) -> f64,
}

const EQUITY_RULES: &[EquityRule] = &[
    EquityRule { name: "glide_path", applies: always, effect: glide_path },
    EquityRule { name: "adaptive_withdrawal", applies: adaptive_withdrawal, effect: tilt_up },
    EquityRule { name: "rigid_withdrawal", applies: rigid_withdrawal, effect: tilt_down },
    EquityRule { name: "defined_benefit_floor", applies: defined_benefit, effect: tilt_up },
    EquityRule { name: "near_retirement", applies: near_retirement, effect: dampen },
    EquityRule { name: "equity_bounds", applies: always, effect: final_bounds },
];

fn always(_: &AllocationProfile) -> bool {
    true
}

fn adaptive_withdrawal(p: &AllocationProfile) -> bool {
    p.withdrawal.is_adaptive()
}

fn rigid_withdrawal(p: &AllocationProfile) -> bool {
    p.withdrawal.is_rigid()
}

fn defined_benefit(p: &AllocationProfile) -> bool {
    p.pension == PensionKind::DefinedBenefit
}

fn near_retirement(p: &AllocationProfile) -> bool {
    p.years_to_retirement()
        .is_some_and(|years| years <= NEAR_RETIREMENT_YEARS)
}

fn glide_path(equity: f64, p: &AllocationProfile) -> f64 {
    let penalty = p
        .age
        .map(|age| ((age as f64 - GLIDE_START_AGE) * GLIDE_SLOPE).max(0.0))
        .unwrap_or(0.0);
    (equity - penalty).clamp(0.25, 0.90)
}

fn tilt_up(equity: f64, _: &AllocationProfile) -> f64 {
    equity + STRATEGY_TILT
}

fn tilt_down(equity: f64, _: &AllocationProfile) -> f64 {
    equity - STRATEGY_TILT
}

fn dampen(equity: f64, _: &AllocationProfile) -> f64 {
    equity - NEAR_RETIREMENT_CUT
}

fn final_bounds(equity: f64, _: &AllocationProfile) -> f64 {
    equity.clamp(0.15, 0.90)
}

fn baseline_equity(risk: RiskTolerance) -> f64 {
    match risk {
        RiskTolerance::Low => 0.40,
        RiskTolerance::Medium => 0.60,
        RiskTolerance::High => 0.75,
    }
}

fn cash_fraction(p: &AllocationProfile) -> f64 {
    let mut cash: f64 = 0.10;
    if p.age.is_some_and(|age| age >= 55) {
        cash += 0.05;
    }
    if p.risk_tolerance == RiskTolerance::Low {
        cash += 0.05;
    }
    cash.clamp(0.05, 0.25)
}

/// Target mix plus the intermediate fractions and the rules that fired
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationRecommendation {
    pub mix: AllocationMix,
    pub equity_fraction: f64,
    pub bonds_fraction: f64,
    pub cash_fraction: f64,
    pub rules_fired: Vec<&'static str>,
}

/// Run the full rule table for a profile
pub fn recommend_with_trace(profile: &AllocationProfile) -> AllocationRecommendation {
    let mut equity = baseline_equity(profile.risk_tolerance);
    let mut rules_fired = Vec::new();

    for rule in EQUITY_RULES {
        if (rule.applies)(profile) {
            equity = (rule.effect)(equity, profile);
            rules_fired.push(rule.name);
        }
    }

    let cash = cash_fraction(profile);
    let bonds = ((1.0 - equity) - cash).max(0.0);

    debug!(
        "Allocation rules {:?} -> equity {:.3}, bonds {:.3}, cash {:.3}",
        rules_fired, equity, bonds, cash
    );

    AllocationRecommendation {
        mix: AllocationMix::from_weights(equity, bonds, cash),
        equity_fraction: equity,
        bonds_fraction: bonds,
        cash_fraction: cash,
        rules_fired,
    }
}

/// Recommend a target mix from raw member attributes
///
/// Unrecognised labels fall back to their documented defaults; there are no
/// error conditions.
pub fn recommend(
    age: Option<u32>,
    risk_tolerance: &str,
    pension_type: &str,
    withdrawal_strategy: &str,
    retirement_age_goal: Option<u32>,
) -> AllocationMix {
    let profile = AllocationProfile::new(
        age,
        risk_tolerance,
        pension_type,
        withdrawal_strategy,
        retirement_age_goal,
    );
    recommend_with_trace(&profile).mix
}

/// Recommend a target mix for a loaded member
pub fn recommend_for_member(member: &MemberRecord) -> AllocationMix {
    recommend_with_trace(&AllocationProfile::from_member(member)).mix
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mid_career_medium_risk() {
        // 0.60 - 0.05 glide - 0.03 fixed = 0.52 equity, 0.10 cash, 0.38 bonds
        let mix = recommend(Some(40), "Medium", "Defined Contribution", "Fixed", Some(65));
        assert_abs_diff_eq!(mix.stocks, 52.0, epsilon = 1e-9);
        assert_abs_diff_eq!(mix.bonds, 38.0, epsilon = 1e-9);
        assert_abs_diff_eq!(mix.cash, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_retiree_is_less_aggressive_than_young_saver() {
        let retiree = recommend(Some(70), "Low", "Defined Contribution", "Fixed", Some(65));
        let young = recommend(Some(25), "High", "Defined Benefit", "Flexible", Some(65));

        assert!(retiree.stocks < young.stocks);
        assert_abs_diff_eq!(retiree.stocks, 17.0, epsilon = 1e-9);
        assert_abs_diff_eq!(retiree.cash, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(young.stocks, 81.0, epsilon = 1e-9);
        assert_abs_diff_eq!(young.cash, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unknown_risk_uses_medium_baseline() {
        let unknown = recommend(Some(30), "Adventurous", "", "", Some(65));
        let medium = recommend(Some(30), "Medium", "", "", Some(65));
        assert_eq!(unknown, medium);
        assert_abs_diff_eq!(medium.stocks, 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rule_trace() {
        let profile = AllocationProfile::new(Some(62), "High", " defined benefit ", "Dynamic", Some(65));
        let rec = recommend_with_trace(&profile);
        assert_eq!(
            rec.rules_fired,
            vec![
                "glide_path",
                "adaptive_withdrawal",
                "defined_benefit_floor",
                "near_retirement",
                "equity_bounds",
            ]
        );
        // 0.75 - 0.16 = 0.59, +0.03 +0.03 -0.05 = 0.60
        assert_abs_diff_eq!(rec.equity_fraction, 0.60, epsilon = 1e-9);
        assert_abs_diff_eq!(rec.cash_fraction, 0.15, epsilon = 1e-9);
    }

    #[test]
    fn test_near_retirement_needs_both_ages() {
        let no_goal = AllocationProfile::new(Some(60), "Medium", "", "Other", None);
        assert!(!recommend_with_trace(&no_goal).rules_fired.contains(&"near_retirement"));

        let no_age = AllocationProfile::new(None, "Medium", "", "Other", Some(65));
        let rec = recommend_with_trace(&no_age);
        assert!(!rec.rules_fired.contains(&"near_retirement"));
        // No age: no glide penalty, no age-based cash bump
        assert_abs_diff_eq!(rec.equity_fraction, 0.60, epsilon = 1e-9);
        assert_abs_diff_eq!(rec.cash_fraction, 0.10, epsilon = 1e-9);
    }

    #[test]
    fn test_cash_fraction_steps() {
        let young = AllocationProfile::new(Some(30), "Medium", "", "Other", None);
        let older = AllocationProfile::new(Some(55), "Medium", "", "Other", None);
        let older_low = AllocationProfile::new(Some(55), "Low", "", "Other", None);

        assert_abs_diff_eq!(cash_fraction(&young), 0.10, epsilon = 1e-12);
        assert_abs_diff_eq!(cash_fraction(&older), 0.15, epsilon = 1e-12);
        assert_abs_diff_eq!(cash_fraction(&older_low), 0.20, epsilon = 1e-12);
    }

    #[test]
    fn test_glide_path_floor() {
        // 0.40 - 0.45 would go negative; the glide clamp holds it at 0.25
        let profile = AllocationProfile::new(Some(120), "Low", "", "Other", None);
        let rec = recommend_with_trace(&profile);
        assert_abs_diff_eq!(rec.equity_fraction, 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_mix_always_sums_to_100() {
        let risks = ["Low", "Medium", "High", "unknown"];
        let pensions = ["Defined Benefit", "Defined Contribution", ""];
        let strategies = ["Flexible", "Dynamic", "Fixed", "Bucket", "Other"];

        for age in (0..=100).step_by(5) {
            for goal in [None, Some(55), Some(65), Some(75)] {
                for risk in risks {
                    for pension in pensions {
                        for strategy in strategies {
                            let mix = recommend(Some(age), risk, pension, strategy, goal);
                            assert!(mix.stocks >= 0.0 && mix.bonds >= 0.0 && mix.cash >= 0.0);
                            assert!(
                                (mix.total() - 100.0).abs() <= 0.1 + 1e-9,
                                "mix {:?} for age {} does not sum to 100",
                                mix,
                                age
                            );
                        }
                    }
                }
            }
        }
    }
}
