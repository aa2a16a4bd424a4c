//! Withdrawal-rate classification against the 4% rule

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound (inclusive) of the Safe band
pub const SAFE_WITHDRAWAL_RATE: f64 = 0.04;
/// Upper bound (inclusive) of the Caution band
pub const CAUTION_WITHDRAWAL_RATE: f64 = 0.06;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskStatus {
    Safe,
    Caution,
    Risky,
}

impl RiskStatus {
    pub fn from_rate(withdrawal_rate: f64) -> Self {
        if withdrawal_rate <= SAFE_WITHDRAWAL_RATE {
            RiskStatus::Safe
        } else if withdrawal_rate <= CAUTION_WITHDRAWAL_RATE {
            RiskStatus::Caution
        } else {
            RiskStatus::Risky
        }
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskStatus::Safe => "Safe",
            RiskStatus::Caution => "Caution",
            RiskStatus::Risky => "Risky",
        };
        f.write_str(label)
    }
}

/// Annual withdrawal over savings, and its band
///
/// Savings of zero (or less) short-circuit to a rate of 0.
pub fn classify(current_savings: f64, monthly_expenses: f64) -> (f64, RiskStatus) {
    let annual_withdrawal = monthly_expenses * 12.0;
    let rate = if current_savings > 0.0 {
        annual_withdrawal / current_savings
    } else {
        0.0
    };
    (rate, RiskStatus::from_rate(rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_band_edges() {
        let (rate, status) = classify(100_000.0, 333.33);
        assert_abs_diff_eq!(rate, 0.04, epsilon = 1e-4);
        assert_eq!(status, RiskStatus::Safe);

        let (rate, status) = classify(100_000.0, 500.0);
        assert_eq!(rate, 0.06);
        assert_eq!(status, RiskStatus::Caution);

        let (rate, status) = classify(100_000.0, 600.0);
        assert_abs_diff_eq!(rate, 0.072, epsilon = 1e-12);
        assert_eq!(status, RiskStatus::Risky);
    }

    #[test]
    fn test_no_savings_is_safe() {
        assert_eq!(classify(0.0, 100.0), (0.0, RiskStatus::Safe));
    }

    #[test]
    fn test_exact_four_percent_is_safe() {
        assert_eq!(RiskStatus::from_rate(0.04), RiskStatus::Safe);
        assert_eq!(RiskStatus::from_rate(0.0401), RiskStatus::Caution);
        assert_eq!(RiskStatus::from_rate(0.040000001), RiskStatus::Caution);
        assert_eq!(RiskStatus::from_rate(0.060000001), RiskStatus::Risky);
        assert_eq!(RiskStatus::Caution.to_string(), "Caution");
    }
}
