//! Member records matching the plan-member spreadsheet format

use serde::{Deserialize, Serialize};

/// Pension type applied when the column is missing
pub const DEFAULT_PENSION_TYPE: &str = "Defined Contribution";

/// Withdrawal strategy applied when the column is missing
pub const DEFAULT_WITHDRAWAL_STRATEGY: &str = "Fixed";

/// Investment type applied when the column is missing
pub const DEFAULT_INVESTMENT_TYPE: &str = "Mixed";

/// Self-reported risk tolerance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTolerance {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskTolerance {
    /// Strict, case-insensitive match on Low/Medium/High
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Some(RiskTolerance::Low),
            "medium" => Some(RiskTolerance::Medium),
            "high" => Some(RiskTolerance::High),
            _ => None,
        }
    }

    /// Parse a free-text label; anything unrecognised is Medium
    pub fn parse(label: &str) -> Self {
        Self::from_label(label).unwrap_or_default()
    }

    /// Numeric encoding used as a clustering feature (Low=1, Medium=2, High=3)
    pub fn score(&self) -> f64 {
        match self {
            RiskTolerance::Low => 1.0,
            RiskTolerance::Medium => 2.0,
            RiskTolerance::High => 3.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTolerance::Low => "Low",
            RiskTolerance::Medium => "Medium",
            RiskTolerance::High => "High",
        }
    }
}

/// Pension scheme kind, reduced to what the allocation rules distinguish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PensionKind {
    /// Any label mentioning "Defined Benefit"
    DefinedBenefit,
    Other,
}

impl PensionKind {
    pub fn classify(label: &str) -> Self {
        if label.trim().to_ascii_lowercase().contains("defined benefit") {
            PensionKind::DefinedBenefit
        } else {
            PensionKind::Other
        }
    }
}

/// Drawdown strategy the member intends to follow in retirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawalStyle {
    Flexible,
    Dynamic,
    Fixed,
    Bucket,
    Other,
}

impl WithdrawalStyle {
    pub fn classify(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "flexible" => WithdrawalStyle::Flexible,
            "dynamic" => WithdrawalStyle::Dynamic,
            "fixed" => WithdrawalStyle::Fixed,
            "bucket" => WithdrawalStyle::Bucket,
            _ => WithdrawalStyle::Other,
        }
    }

    /// Strategies that tolerate sequence risk and can carry more equity
    pub fn is_adaptive(&self) -> bool {
        matches!(self, WithdrawalStyle::Flexible | WithdrawalStyle::Dynamic)
    }

    /// Strategies that draw a set amount regardless of markets
    pub fn is_rigid(&self) -> bool {
        matches!(self, WithdrawalStyle::Fixed | WithdrawalStyle::Bucket)
    }
}

/// Broad category of the member's current investment vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvestmentKind {
    Bond,
    Equity,
    Balanced,
    Other,
}

impl InvestmentKind {
    /// Substring match in priority order; the first hit wins
    pub fn classify(label: Option<&str>) -> Self {
        let label = label.unwrap_or(DEFAULT_INVESTMENT_TYPE).trim().to_ascii_lowercase();

        if label.contains("bond") {
            InvestmentKind::Bond
        } else if label.contains("equity") || label.contains("stock") {
            InvestmentKind::Equity
        } else if ["balanced", "mixed", "fund"].iter().any(|k| label.contains(k)) {
            InvestmentKind::Balanced
        } else {
            InvestmentKind::Other
        }
    }
}

/// A single plan member
///
/// Numeric fields are `None` when the source cell was missing or out of
/// range; aggregates skip them instead of treating them as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    /// Unique member identifier
    pub member_id: String,

    /// Age in whole years, at most 150
    pub age: Option<u32>,

    pub annual_income: Option<f64>,

    pub current_savings: Option<f64>,

    pub monthly_expenses: Option<f64>,

    /// Yearly contribution into the plan
    pub contribution_amount: Option<f64>,

    /// Target retirement age in whole years (1 to 150 when present)
    pub retirement_age_goal: Option<u32>,

    pub risk_tolerance: RiskTolerance,

    pub pension_type: String,

    pub withdrawal_strategy: String,

    pub investment_type: String,
}

impl MemberRecord {
    /// Create a member with every numeric field absent and categorical defaults applied
    pub fn new(member_id: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
            age: None,
            annual_income: None,
            current_savings: None,
            monthly_expenses: None,
            contribution_amount: None,
            retirement_age_goal: None,
            risk_tolerance: RiskTolerance::default(),
            pension_type: DEFAULT_PENSION_TYPE.to_string(),
            withdrawal_strategy: DEFAULT_WITHDRAWAL_STRATEGY.to_string(),
            investment_type: DEFAULT_INVESTMENT_TYPE.to_string(),
        }
    }

    pub fn pension_kind(&self) -> PensionKind {
        PensionKind::classify(&self.pension_type)
    }

    pub fn withdrawal_style(&self) -> WithdrawalStyle {
        WithdrawalStyle::classify(&self.withdrawal_strategy)
    }

    pub fn investment_kind(&self) -> InvestmentKind {
        InvestmentKind::classify(Some(&self.investment_type))
    }

    /// Years until the retirement goal, floored at 0; `None` if either age is absent
    pub fn years_to_retirement(&self) -> Option<u32> {
        match (self.age, self.retirement_age_goal) {
            (Some(age), Some(goal)) => Some(goal.saturating_sub(age)),
            _ => None,
        }
    }

    /// Whether the member has reached their retirement goal
    pub fn is_retired(&self) -> bool {
        self.years_to_retirement() == Some(0)
    }

    /// Spending converted to a yearly figure
    pub fn annual_expenses(&self) -> f64 {
        self.monthly_expenses.unwrap_or(0.0) * 12.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_tolerance_parse() {
        assert_eq!(RiskTolerance::parse("Low"), RiskTolerance::Low);
        assert_eq!(RiskTolerance::parse("  HIGH "), RiskTolerance::High);
        assert_eq!(RiskTolerance::parse("medium"), RiskTolerance::Medium);
        // Unmapped labels fall back to Medium and score 2
        assert_eq!(RiskTolerance::parse("Very High"), RiskTolerance::Medium);
        assert_eq!(RiskTolerance::parse("").score(), 2.0);
    }

    #[test]
    fn test_risk_tolerance_from_label_is_strict() {
        assert_eq!(RiskTolerance::from_label(" Low "), Some(RiskTolerance::Low));
        assert_eq!(RiskTolerance::from_label("MEDIUM"), Some(RiskTolerance::Medium));
        assert_eq!(RiskTolerance::from_label("high"), Some(RiskTolerance::High));
        assert_eq!(RiskTolerance::from_label("Very High"), None);
        assert_eq!(RiskTolerance::from_label(""), None);
    }

    #[test]
    fn test_investment_kind_priority() {
        // "Bond Fund" hits "bond" before "fund"
        assert_eq!(InvestmentKind::classify(Some("Bond Fund")), InvestmentKind::Bond);
        assert_eq!(InvestmentKind::classify(Some("Stock Index")), InvestmentKind::Equity);
        assert_eq!(InvestmentKind::classify(Some("Global EQUITY")), InvestmentKind::Equity);
        assert_eq!(InvestmentKind::classify(Some("Target Date Fund")), InvestmentKind::Balanced);
        assert_eq!(InvestmentKind::classify(None), InvestmentKind::Balanced);
        assert_eq!(InvestmentKind::classify(Some("")), InvestmentKind::Other);
        assert_eq!(InvestmentKind::classify(Some("Real Estate")), InvestmentKind::Other);
    }

    #[test]
    fn test_pension_and_withdrawal_classification() {
        assert_eq!(PensionKind::classify(" defined benefit plan "), PensionKind::DefinedBenefit);
        assert_eq!(PensionKind::classify("Defined Contribution"), PensionKind::Other);

        assert!(WithdrawalStyle::classify("Flexible").is_adaptive());
        assert!(WithdrawalStyle::classify("dynamic").is_adaptive());
        assert!(WithdrawalStyle::classify("Bucket").is_rigid());
        let other = WithdrawalStyle::classify("Annuitize");
        assert!(!other.is_adaptive() && !other.is_rigid());
    }

    #[test]
    fn test_member_timing() {
        let mut member = MemberRecord::new("M001");
        assert_eq!(member.years_to_retirement(), None);
        assert!(!member.is_retired());

        member.age = Some(60);
        member.retirement_age_goal = Some(65);
        assert_eq!(member.years_to_retirement(), Some(5));

        member.age = Some(70);
        assert_eq!(member.years_to_retirement(), Some(0));
        assert!(member.is_retired());
    }
}
