//! Loan eligibility scoring and interest computation.

pub mod policy;
pub mod types;

#[cfg(test)]
mod policy_props;

pub use policy::{LoanPolicy, ScoreInputs};
pub use types::{LOAN_TERM_DAYS, LoanStatus, total_due};
