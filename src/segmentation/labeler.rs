//! Descriptive cluster labels and advisor playbooks

use super::profile::ClusterProfile;
use serde::Serialize;
use std::fmt;

/// Mean risk score at or above which a cluster reads as aggressive
pub const AGGRESSIVE_RISK_SCORE: f64 = 2.5;
/// Mean risk score at or below which a cluster reads as conservative
pub const CONSERVATIVE_RISK_SCORE: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SegmentLabel {
    HighCapacitySavers,
    HighIncomeLowSavings,
    AggressiveUnderfunded,
    ConservativeFunded,
    Balanced,
    Empty,
}

impl SegmentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentLabel::HighCapacitySavers => "High Capacity Savers",
            SegmentLabel::HighIncomeLowSavings => "High Income, Low Savings",
            SegmentLabel::AggressiveUnderfunded => "Aggressive & Underfunded",
            SegmentLabel::ConservativeFunded => "Conservative & Funded",
            SegmentLabel::Balanced => "Balanced",
            SegmentLabel::Empty => "Empty Cluster",
        }
    }

    pub fn playbook(&self) -> Playbook {
        match self {
            SegmentLabel::HighCapacitySavers => Playbook {
                description: "High earners with substantial savings, suited to advanced planning",
                actions: &[
                    "Offer premium investment products and private banking services",
                    "Discuss tax-efficient strategies and estate planning",
                    "Present alternative investment opportunities",
                ],
                risks: &["Market volatility impact on large portfolios"],
            },
            SegmentLabel::HighIncomeLowSavings => Playbook {
                description: "High earners who need help with savings discipline and budgeting",
                actions: &[
                    "Implement automatic contribution increases",
                    "Provide budgeting and expense management tools",
                    "Set up catch-up contribution schedules",
                ],
                risks: &["Lifestyle inflation", "Insufficient retirement savings"],
            },
            SegmentLabel::AggressiveUnderfunded => Playbook {
                description: "High risk tolerance with low savings; growth has to be balanced against security",
                actions: &[
                    "Educate on risk management and diversification",
                    "Increase contribution rates before taking more risk",
                    "Consider target-date funds for automatic rebalancing",
                ],
                risks: &["Excessive risk taking", "Inadequate emergency funds"],
            },
            SegmentLabel::ConservativeFunded => Playbook {
                description: "Well-funded members who may be too risk-averse for long-term growth",
                actions: &[
                    "Gradually introduce growth-oriented investments",
                    "Explain the inflation risk of overly conservative allocations",
                    "Consider inflation-protected government bonds",
                ],
                risks: &["Inflation erosion", "Insufficient growth for retirement goals"],
            },
            SegmentLabel::Balanced => Playbook {
                description: "Members with moderate risk and savings profiles",
                actions: &[
                    "Regular portfolio reviews and rebalancing",
                    "Gradual contribution increases with salary growth",
                    "Education on lifecycle investing",
                ],
                risks: &["Complacency", "Not adjusting strategy with life changes"],
            },
            SegmentLabel::Empty => Playbook {
                description: "No members in this cluster",
                actions: &[],
                risks: &[],
            },
        }
    }
}

impl fmt::Display for SegmentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advisor guidance attached to a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Playbook {
    pub description: &'static str,
    pub actions: &'static [&'static str],
    pub risks: &'static [&'static str],
}

/// Label a cluster from its mean savings, income and risk score
///
/// Rules are checked in order and the first match wins.
pub fn label(profile: &ClusterProfile, median_savings: f64, median_income: f64) -> SegmentLabel {
    if profile.is_empty() {
        return SegmentLabel::Empty;
    }
    let savings = profile.current_savings.mean;
    let income = profile.annual_income.mean;
    let risk = profile.risk_score.mean;

    if savings >= median_savings && income >= median_income {
        SegmentLabel::HighCapacitySavers
    } else if savings < median_savings && income >= median_income {
        SegmentLabel::HighIncomeLowSavings
    } else if risk >= AGGRESSIVE_RISK_SCORE && savings < median_savings {
        SegmentLabel::AggressiveUnderfunded
    } else if risk <= CONSERVATIVE_RISK_SCORE && savings >= median_savings {
        SegmentLabel::ConservativeFunded
    } else {
        SegmentLabel::Balanced
    }
}
