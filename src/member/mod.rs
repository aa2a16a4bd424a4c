//! Member data structures and member-book loading

mod data;
pub mod loader;

pub use data::{
    MemberRecord, RiskTolerance, PensionKind, WithdrawalStyle, InvestmentKind,
    DEFAULT_PENSION_TYPE, DEFAULT_WITHDRAWAL_STRATEGY, DEFAULT_INVESTMENT_TYPE,
};
pub use loader::{load_members, load_members_from_reader, find_member, MAX_AGE_YEARS};
