//! Balance mutation rules.
//!
//! Pure functions with no database dependencies. The database layer reads a
//! wallet row under an exclusive lock, builds a [`WalletSnapshot`], and asks
//! these rules for the new balance; it never computes balances itself.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::WalletSnapshot;

/// Maximum decimal places in a monetary amount.
const AMOUNT_SCALE: u32 = 2;

/// Validates a transaction amount: strictly positive, at most two decimal
/// places.
///
/// # Errors
///
/// Returns `ZeroAmount`, `NegativeAmount`, or `AmountPrecision`.
pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount == Decimal::ZERO {
        return Err(LedgerError::ZeroAmount);
    }
    if amount < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount);
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(LedgerError::AmountPrecision);
    }
    Ok(())
}

/// Applies a signed delta to a wallet snapshot and returns the new balance.
///
/// Credits only require the wallet to exist. Debits additionally require the
/// wallet to be active and not frozen, and must not drive the balance
/// negative.
///
/// # Errors
///
/// Returns `ZeroAmount` for a zero delta, `AmountPrecision` for more than
/// two decimal places, `WalletFrozen`/`WalletInactive` for gated debits, and
/// `InsufficientFunds` when the debit exceeds the balance.
pub fn apply_signed(wallet: &WalletSnapshot, delta: Decimal) -> Result<Decimal, LedgerError> {
    if delta == Decimal::ZERO {
        return Err(LedgerError::ZeroAmount);
    }
    if delta.normalize().scale() > AMOUNT_SCALE {
        return Err(LedgerError::AmountPrecision);
    }

    if delta < Decimal::ZERO {
        if !wallet.is_active {
            return Err(LedgerError::WalletInactive(wallet.id));
        }
        if wallet.is_frozen {
            return Err(LedgerError::WalletFrozen(wallet.id));
        }
    }

    let new_balance = wallet.balance + delta;
    if new_balance < Decimal::ZERO {
        return Err(LedgerError::InsufficientFunds);
    }

    Ok(new_balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn wallet(balance: Decimal) -> WalletSnapshot {
        WalletSnapshot {
            id: Uuid::new_v4(),
            balance,
            is_active: true,
            is_frozen: false,
        }
    }

    #[test]
    fn test_validate_amount_positive() {
        assert!(validate_amount(dec!(0.01)).is_ok());
        assert!(validate_amount(dec!(150)).is_ok());
        assert!(validate_amount(dec!(99.99)).is_ok());
    }

    #[test]
    fn test_validate_amount_zero() {
        assert!(matches!(
            validate_amount(Decimal::ZERO),
            Err(LedgerError::ZeroAmount)
        ));
    }

    #[test]
    fn test_validate_amount_negative() {
        assert!(matches!(
            validate_amount(dec!(-5)),
            Err(LedgerError::NegativeAmount)
        ));
    }

    #[test]
    fn test_validate_amount_precision() {
        assert!(matches!(
            validate_amount(dec!(1.001)),
            Err(LedgerError::AmountPrecision)
        ));
        // Trailing zeros beyond scale 2 are fine once normalized.
        assert!(validate_amount(dec!(1.100)).is_ok());
    }

    #[test]
    fn test_credit_increases_balance() {
        let w = wallet(dec!(100.00));
        assert_eq!(apply_signed(&w, dec!(50.00)).unwrap(), dec!(150.00));
    }

    #[test]
    fn test_debit_decreases_balance() {
        let w = wallet(dec!(100.00));
        assert_eq!(apply_signed(&w, dec!(-40.00)).unwrap(), dec!(60.00));
    }

    #[test]
    fn test_debit_to_exactly_zero_allowed() {
        let w = wallet(dec!(100.00));
        assert_eq!(apply_signed(&w, dec!(-100.00)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_overdraft_rejected() {
        // Account with 100.00, withdraw 150.00 -> insufficient funds.
        let w = wallet(dec!(100.00));
        assert!(matches!(
            apply_signed(&w, dec!(-150.00)),
            Err(LedgerError::InsufficientFunds)
        ));
    }

    #[test]
    fn test_zero_delta_rejected() {
        let w = wallet(dec!(100.00));
        assert!(matches!(
            apply_signed(&w, Decimal::ZERO),
            Err(LedgerError::ZeroAmount)
        ));
    }

    #[test]
    fn test_frozen_wallet_rejects_debit() {
        let mut w = wallet(dec!(100.00));
        w.is_frozen = true;
        assert!(matches!(
            apply_signed(&w, dec!(-10.00)),
            Err(LedgerError::WalletFrozen(_))
        ));
    }

    #[test]
    fn test_frozen_wallet_accepts_credit() {
        let mut w = wallet(dec!(100.00));
        w.is_frozen = true;
        assert_eq!(apply_signed(&w, dec!(10.00)).unwrap(), dec!(110.00));
    }

    #[test]
    fn test_inactive_wallet_rejects_debit() {
        let mut w = wallet(dec!(100.00));
        w.is_active = false;
        assert!(matches!(
            apply_signed(&w, dec!(-10.00)),
            Err(LedgerError::WalletInactive(_))
        ));
    }
}
