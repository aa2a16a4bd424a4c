//! Load member records from the plan-member CSV export
//!
//! Column-level defaults are applied here, at load time, so the analytics
//! modules never have to guess at missing categorical fields.

use super::{
    MemberRecord, RiskTolerance, DEFAULT_INVESTMENT_TYPE, DEFAULT_PENSION_TYPE,
    DEFAULT_WITHDRAWAL_STRATEGY,
};
use crate::error::LoadError;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::collections::HashSet;
use std::path::Path;

/// Raw CSV row; every column is optional and parsed leniently
#[derive(Debug, Default, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "User_ID", default)]
    user_id: Option<String>,
    #[serde(rename = "Age", default)]
    age: Option<String>,
    #[serde(rename = "Annual_Income", default)]
    annual_income: Option<String>,
    #[serde(rename = "Current_Savings", default)]
    current_savings: Option<String>,
    #[serde(rename = "Monthly_Expenses", default)]
    monthly_expenses: Option<String>,
    #[serde(rename = "Contribution_Amount", default)]
    contribution_amount: Option<String>,
    #[serde(rename = "Retirement_Age_Goal", default)]
    retirement_age_goal: Option<String>,
    #[serde(rename = "Risk_Tolerance", default)]
    risk_tolerance: Option<String>,
    #[serde(rename = "Pension_Type", default)]
    pension_type: Option<String>,
    #[serde(rename = "Withdrawal_Strategy", default)]
    withdrawal_strategy: Option<String>,
    #[serde(rename = "Investment_Type", default)]
    investment_type: Option<String>,
}

impl CsvRow {
    fn to_member(self, row: usize) -> Result<MemberRecord, LoadError> {
        let member_id = non_empty(self.user_id).ok_or(LoadError::MissingId { row })?;

        Ok(MemberRecord {
            age: parse_years(self.age.as_deref(), false),
            annual_income: parse_amount(self.annual_income.as_deref()),
            current_savings: parse_amount(self.current_savings.as_deref()),
            monthly_expenses: parse_amount(self.monthly_expenses.as_deref()),
            contribution_amount: parse_amount(self.contribution_amount.as_deref()),
            retirement_age_goal: parse_years(self.retirement_age_goal.as_deref(), true),
            risk_tolerance: non_empty(self.risk_tolerance)
                .map(|r| RiskTolerance::parse(&r))
                .unwrap_or_default(),
            pension_type: non_empty(self.pension_type)
                .unwrap_or_else(|| DEFAULT_PENSION_TYPE.to_string()),
            withdrawal_strategy: non_empty(self.withdrawal_strategy)
                .unwrap_or_else(|| DEFAULT_WITHDRAWAL_STRATEGY.to_string()),
            investment_type: non_empty(self.investment_type)
                .unwrap_or_else(|| DEFAULT_INVESTMENT_TYPE.to_string()),
            member_id,
        })
    }
}

fn non_empty(cell: Option<String>) -> Option<String> {
    cell.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Currency amount: empty, unparsable, non-finite or negative cells are absent
fn parse_amount(cell: Option<&str>) -> Option<f64> {
    let cell = cell?.trim();
    if cell.is_empty() {
        return None;
    }
    match cell.replace(',', "").parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
        _ => {
            debug!("Treating out-of-range amount {:?} as absent", cell);
            None
        }
    }
}

/// Largest age or retirement-age goal accepted from the book
pub const MAX_AGE_YEARS: u32 = 150;

/// Whole years; fractional values are truncated, implausible ones are absent
fn parse_years(cell: Option<&str>, strictly_positive: bool) -> Option<u32> {
    let years = parse_amount(cell)?;
    if strictly_positive && years < 1.0 {
        return None;
    }
    if years >= (MAX_AGE_YEARS + 1) as f64 {
        return None;
    }
    Some(years.trunc() as u32)
}

/// Load all members from a CSV file
pub fn load_members<P: AsRef<Path>>(path: P) -> Result<Vec<MemberRecord>, LoadError> {
    let file = std::fs::File::open(path)?;
    load_members_from_reader(file)
}

/// Load members from any reader (e.g., string buffer, uploaded file)
pub fn load_members_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<MemberRecord>, LoadError> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut members = Vec::new();
    let mut seen = HashSet::new();

    for (idx, result) in csv_reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        let member = row.to_member(idx + 1)?;

        if !seen.insert(member.member_id.clone()) {
            return Err(LoadError::DuplicateId(member.member_id));
        }
        if member.age.is_none() {
            warn!("Member {} has no usable age; excluded from age-based rules", member.member_id);
        }
        members.push(member);
    }

    debug!("Loaded {} members", members.len());
    Ok(members)
}

/// Find a member by identifier
pub fn find_member<'a>(members: &'a [MemberRecord], member_id: &str) -> Option<&'a MemberRecord> {
    members.iter().find(|m| m.member_id == member_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
User_ID,Age,Annual_Income,Current_Savings,Monthly_Expenses,Contribution_Amount,Retirement_Age_Goal,Risk_Tolerance,Pension_Type,Withdrawal_Strategy,Investment_Type
U1,45,85000,120000,3000,6000,65,High,Defined Benefit,Flexible,Equity Fund
U2,,52000,-5,,abc,0,,,,
U3,61.7,40000,300000,2500,0,65,low,Defined Contribution,Fixed,Bond Fund
";

    #[test]
    fn test_load_members() {
        let members = load_members_from_reader(SAMPLE.as_bytes()).expect("Failed to load members");
        assert_eq!(members.len(), 3);

        let u1 = &members[0];
        assert_eq!(u1.member_id, "U1");
        assert_eq!(u1.age, Some(45));
        assert_eq!(u1.current_savings, Some(120_000.0));
        assert_eq!(u1.risk_tolerance, RiskTolerance::High);
        assert_eq!(u1.investment_type, "Equity Fund");

        let u3 = &members[2];
        assert_eq!(u3.age, Some(61));
        assert_eq!(u3.risk_tolerance, RiskTolerance::Low);
    }

    #[test]
    fn test_absent_numerics_and_categorical_defaults() {
        let members = load_members_from_reader(SAMPLE.as_bytes()).unwrap();
        let u2 = &members[1];

        assert_eq!(u2.age, None);
        assert_eq!(u2.annual_income, Some(52_000.0));
        // Negative, unparsable and zero-goal cells become absent, not zero
        assert_eq!(u2.current_savings, None);
        assert_eq!(u2.contribution_amount, None);
        assert_eq!(u2.retirement_age_goal, None);

        assert_eq!(u2.risk_tolerance, RiskTolerance::Medium);
        assert_eq!(u2.pension_type, DEFAULT_PENSION_TYPE);
        assert_eq!(u2.withdrawal_strategy, DEFAULT_WITHDRAWAL_STRATEGY);
        assert_eq!(u2.investment_type, DEFAULT_INVESTMENT_TYPE);
    }

    #[test]
    fn test_missing_columns_use_defaults() {
        let csv = "User_ID,Age,Current_Savings\nA,30,1000\n";
        let members = load_members_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(members[0].age, Some(30));
        assert_eq!(members[0].annual_income, None);
        assert_eq!(members[0].risk_tolerance, RiskTolerance::Medium);
        assert_eq!(members[0].pension_type, DEFAULT_PENSION_TYPE);
    }

    #[test]
    fn test_duplicate_and_missing_ids() {
        let dup = "User_ID,Age\nA,30\nA,31\n";
        assert!(matches!(
            load_members_from_reader(dup.as_bytes()),
            Err(LoadError::DuplicateId(id)) if id == "A"
        ));

        let missing = "User_ID,Age\nA,30\n,31\n";
        assert!(matches!(
            load_members_from_reader(missing.as_bytes()),
            Err(LoadError::MissingId { row: 2 })
        ));
    }

    #[test]
    fn test_implausible_ages_are_absent() {
        let csv = "User_ID,Age,Retirement_Age_Goal\nA,4000000000,70\nB,150.5,4000000000\nC,151,65\n";
        let members = load_members_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(members[0].age, None);
        assert_eq!(members[0].retirement_age_goal, Some(70));
        assert_eq!(members[1].age, Some(MAX_AGE_YEARS));
        assert_eq!(members[1].retirement_age_goal, None);
        assert_eq!(members[2].age, None);
    }

    #[test]
    fn test_find_member() {
        let members = load_members_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(find_member(&members, "U3").map(|m| m.age), Some(Some(61)));
        assert!(find_member(&members, "nope").is_none());
    }
}
