//! Per-member withdrawal risk alert with a pure-drawdown projection

use super::withdrawal::{classify, RiskStatus};
use crate::config::ProjectionAssumptions;
use crate::member::MemberRecord;
use crate::projection::{project, ProjectionSeries};
use log::debug;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAlert {
    pub member_id: String,
    pub withdrawal_rate: f64,
    pub status: RiskStatus,
    pub annual_withdrawal: f64,
    /// Years projected, from the configured drawdown horizon
    pub horizon_years: u32,
    /// Savings run down by the annual withdrawal with no growth
    pub drawdown: ProjectionSeries,
    /// Year the savings run out; `None` if they outlast the horizon
    pub years_of_coverage: Option<u32>,
}

/// Classify a member's withdrawal rate and project how long savings last
///
/// Absent savings or expenses count as zero here.
pub fn risk_alert(member: &MemberRecord, assumptions: &ProjectionAssumptions) -> RiskAlert {
    let savings = member.current_savings.unwrap_or(0.0);
    let monthly_expenses = member.monthly_expenses.unwrap_or(0.0);
    let (withdrawal_rate, status) = classify(savings, monthly_expenses);
    let annual_withdrawal = member.annual_expenses();

    let horizon_years = assumptions.drawdown_years.max(1);

    let drawdown = project(savings, -annual_withdrawal, 0.0, horizon_years);
    let years_of_coverage = drawdown.depleted_in_year;

    debug!(
        "Member {}: withdrawal rate {:.4} ({}), coverage {:?} of {} years",
        member.member_id, withdrawal_rate, status, years_of_coverage, horizon_years
    );

    RiskAlert {
        member_id: member.member_id.clone(),
        withdrawal_rate,
        status,
        annual_withdrawal,
        horizon_years,
        drawdown,
        years_of_coverage,
    }
}

/// Count of members per status across a book
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskDistribution {
    pub safe: usize,
    pub caution: usize,
    pub risky: usize,
}

impl RiskDistribution {
    pub fn from_statuses<I: IntoIterator<Item = RiskStatus>>(statuses: I) -> Self {
        statuses.into_iter().fold(Self::default(), |mut dist, status| {
            match status {
                RiskStatus::Safe => dist.safe += 1,
                RiskStatus::Caution => dist.caution += 1,
                RiskStatus::Risky => dist.risky += 1,
            }
            dist
        })
    }

    pub fn total(&self) -> usize {
        self.safe + self.caution + self.risky
    }
}
