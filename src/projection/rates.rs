//! Fixed growth-rate assumptions for named market scenarios

use serde::{Deserialize, Serialize};

pub const CONSERVATIVE_RATE: f64 = 0.04;
pub const MODERATE_RATE: f64 = 0.06;
pub const AGGRESSIVE_RATE: f64 = 0.08;

/// Amount subtracted from the nominal rate when projecting in real terms
pub const INFLATION_ADJUSTMENT: f64 = 0.02;

/// Named market outlook selected by the advisor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketScenario {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

impl MarketScenario {
    /// Accepts the scenario names and the risk-tolerance aliases
    /// (Low/Medium/High); unknown labels are `None`
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "conservative" | "low" => Some(MarketScenario::Conservative),
            "moderate" | "medium" => Some(MarketScenario::Moderate),
            "aggressive" | "high" => Some(MarketScenario::Aggressive),
            _ => None,
        }
    }

    pub fn nominal_rate(&self) -> f64 {
        match self {
            MarketScenario::Conservative => CONSERVATIVE_RATE,
            MarketScenario::Moderate => MODERATE_RATE,
            MarketScenario::Aggressive => AGGRESSIVE_RATE,
        }
    }

    /// Growth rate, optionally net of inflation
    pub fn annual_rate(&self, inflation_adjusted: bool) -> f64 {
        if inflation_adjusted {
            self.nominal_rate() - INFLATION_ADJUSTMENT
        } else {
            self.nominal_rate()
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketScenario::Conservative => "Conservative",
            MarketScenario::Moderate => "Moderate",
            MarketScenario::Aggressive => "Aggressive",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_scenario_rates() {
        assert_eq!(MarketScenario::parse("Low"), Some(MarketScenario::Conservative));
        assert_eq!(MarketScenario::parse(" moderate "), Some(MarketScenario::Moderate));
        assert_eq!(MarketScenario::parse("High"), Some(MarketScenario::Aggressive));
        assert_eq!(MarketScenario::parse("Bullish"), None);

        assert_abs_diff_eq!(MarketScenario::Conservative.annual_rate(false), 0.04);
        assert_abs_diff_eq!(MarketScenario::Aggressive.annual_rate(true), 0.06, epsilon = 1e-12);
        assert_abs_diff_eq!(MarketScenario::Moderate.annual_rate(true), 0.04, epsilon = 1e-12);
    }
}
