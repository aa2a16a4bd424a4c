//! Withdrawal-rate risk classification and alerts

mod withdrawal;
mod alert;

pub use withdrawal::{classify, RiskStatus, SAFE_WITHDRAWAL_RATE, CAUTION_WITHDRAWAL_RATE};
pub use alert::{risk_alert, RiskAlert, RiskDistribution};
