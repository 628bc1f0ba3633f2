//! Loan domain types.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Days until a disbursed loan falls due.
pub const LOAN_TERM_DAYS: i64 = 30;

/// Loan lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// Application received, not yet decided.
    Pending,
    /// Disbursed and outstanding.
    Approved,
    /// Application declined.
    Rejected,
    /// Fully repaid.
    Repaid,
}

impl LoanStatus {
    /// Returns true if the loan can be repaid.
    #[must_use]
    pub fn is_repayable(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// Computes the total amount due for a loan.
///
/// `principal + principal * rate / 100`, banker's rounding to two decimal
/// places. Computed once at creation and frozen on the loan row.
#[must_use]
pub fn total_due(principal: Decimal, interest_rate: Decimal) -> Decimal {
    let interest = principal * interest_rate / Decimal::ONE_HUNDRED;
    (principal + interest).round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_total_due_ten_percent() {
        // 1000 at 10% -> 1100.00
        assert_eq!(total_due(dec!(1000), dec!(10)), dec!(1100.00));
    }

    #[test]
    fn test_total_due_zero_rate() {
        assert_eq!(total_due(dec!(500.00), dec!(0)), dec!(500.00));
    }

    #[test]
    fn test_total_due_rounds_to_cents() {
        // 333.33 at 7.5% = 333.33 + 24.99975 -> 358.33 (banker's rounding)
        assert_eq!(total_due(dec!(333.33), dec!(7.5)), dec!(358.33));
    }

    #[test]
    fn test_total_due_bankers_midpoint() {
        // 100.10 at 5% = 105.105; the half cent rounds to the even digit.
        assert_eq!(total_due(dec!(100.10), dec!(5)), dec!(105.10));
    }

    #[test]
    fn test_repayable_status() {
        assert!(LoanStatus::Approved.is_repayable());
        assert!(!LoanStatus::Pending.is_repayable());
        assert!(!LoanStatus::Rejected.is_repayable());
        assert!(!LoanStatus::Repaid.is_repayable());
    }
}
