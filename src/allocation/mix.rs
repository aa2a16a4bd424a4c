//! Stocks/bonds/cash mix expressed in percentages

use serde::{Deserialize, Serialize};

/// Asset mix in percentage points; the three classes sum to 100 (±0.1 after rounding)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationMix {
    pub stocks: f64,
    pub bonds: f64,
    pub cash: f64,
}

/// Mix assumed whenever nothing better is known
pub const DEFAULT_MIX: AllocationMix = AllocationMix {
    stocks: 50.0,
    bonds: 40.0,
    cash: 10.0,
};

impl AllocationMix {
    /// Build a mix from exact percentages without normalising
    pub const fn new(stocks: f64, bonds: f64, cash: f64) -> Self {
        Self { stocks, bonds, cash }
    }

    /// Scale non-negative weights so they sum to 100, rounded to one decimal
    ///
    /// Callers must pass a positive total; see `normalized_or_default`.
    pub fn from_weights(stocks: f64, bonds: f64, cash: f64) -> Self {
        let total = stocks + bonds + cash;
        Self {
            stocks: round_tenth(stocks / total * 100.0),
            bonds: round_tenth(bonds / total * 100.0),
            cash: round_tenth(cash / total * 100.0),
        }
    }

    /// Re-normalise an edited triple; an all-zero triple falls back to the default mix
    pub fn normalized_or_default(stocks: f64, bonds: f64, cash: f64) -> Self {
        let (stocks, bonds, cash) = (stocks.max(0.0), bonds.max(0.0), cash.max(0.0));
        if stocks + bonds + cash <= 0.0 {
            let d = DEFAULT_MIX;
            return Self::from_weights(d.stocks, d.bonds, d.cash);
        }
        Self::from_weights(stocks, bonds, cash)
    }

    pub fn total(&self) -> f64 {
        self.stocks + self.bonds + self.cash
    }

    /// Equity share as a fraction of 1
    pub fn equity_fraction(&self) -> f64 {
        self.stocks / 100.0
    }
}

/// Round to one decimal place
pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_from_weights_sums_to_100() {
        let mix = AllocationMix::from_weights(1.0, 1.0, 1.0);
        assert_abs_diff_eq!(mix.stocks, 33.3);
        assert_abs_diff_eq!(mix.total(), 100.0, epsilon = 0.1 + 1e-9);
    }

    #[test]
    fn test_override_normalisation() {
        let mix = AllocationMix::normalized_or_default(30.0, 30.0, 0.0);
        assert_eq!(mix, AllocationMix::new(50.0, 50.0, 0.0));

        let mix = AllocationMix::normalized_or_default(0.0, 0.0, 0.0);
        assert_eq!(mix, DEFAULT_MIX);

        // Negative edits are treated as zero weight
        let mix = AllocationMix::normalized_or_default(-10.0, 80.0, 20.0);
        assert_eq!(mix, AllocationMix::new(0.0, 80.0, 20.0));
    }
}
