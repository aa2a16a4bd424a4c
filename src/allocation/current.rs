//! Estimate a member's current mix from their investment-type label

use super::mix::{AllocationMix, DEFAULT_MIX};
use crate::member::InvestmentKind;

impl InvestmentKind {
    /// Assumed mix for each investment category
    pub fn assumed_mix(&self) -> AllocationMix {
        match self {
            InvestmentKind::Bond => AllocationMix::new(20.0, 70.0, 10.0),
            InvestmentKind::Equity => AllocationMix::new(70.0, 20.0, 10.0),
            InvestmentKind::Balanced | InvestmentKind::Other => DEFAULT_MIX,
        }
    }
}

/// Assumed current mix for a free-text investment type; `None` is read as "Mixed"
pub fn estimate_current(investment_type: Option<&str>) -> AllocationMix {
    InvestmentKind::classify(investment_type).assumed_mix()
}

/// Current mix after an advisor override, if any
///
/// The edited triple is re-normalised to 100; an all-zero edit is replaced
/// by the default mix.
pub fn resolve_current(investment_type: Option<&str>, overridden: Option<[f64; 3]>) -> AllocationMix {
    match overridden {
        Some([stocks, bonds, cash]) => AllocationMix::normalized_or_default(stocks, bonds, cash),
        None => estimate_current(investment_type),
    }
}
