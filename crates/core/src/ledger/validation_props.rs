//! Property tests for balance mutation rules.

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::LedgerError;
use super::types::WalletSnapshot;
use super::validation::apply_signed;

/// Strategy for non-negative balances with 2 decimal places.
fn balance_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_00i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for non-zero signed deltas with 2 decimal places.
fn delta_strategy() -> impl Strategy<Value = Decimal> {
    (-1_000_000_00i64..1_000_000_00i64)
        .prop_filter("delta must be non-zero", |n| *n != 0)
        .prop_map(|n| Decimal::new(n, 2))
}

fn wallet(balance: Decimal) -> WalletSnapshot {
    WalletSnapshot {
        id: Uuid::from_u128(1),
        balance,
        is_active: true,
        is_frozen: false,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any starting balance and delta, a successful mutation never
    /// produces a negative balance.
    #[test]
    fn prop_balance_never_negative(
        balance in balance_strategy(),
        delta in delta_strategy(),
    ) {
        let w = wallet(balance);
        if let Ok(new_balance) = apply_signed(&w, delta) {
            prop_assert!(new_balance >= Decimal::ZERO);
            prop_assert_eq!(new_balance, balance + delta);
        }
    }

    /// A rejected mutation reports exactly the expected failure.
    #[test]
    fn prop_overdraft_always_rejected(
        balance in balance_strategy(),
        delta in delta_strategy(),
    ) {
        prop_assume!(balance + delta < Decimal::ZERO);

        let w = wallet(balance);
        prop_assert!(matches!(
            apply_signed(&w, delta),
            Err(LedgerError::InsufficientFunds)
        ));
    }

    /// Credits succeed regardless of frozen state.
    #[test]
    fn prop_credits_ignore_frozen_flag(
        balance in balance_strategy(),
        delta in delta_strategy(),
    ) {
        prop_assume!(delta > Decimal::ZERO);

        let mut w = wallet(balance);
        w.is_frozen = true;
        prop_assert_eq!(apply_signed(&w, delta).unwrap(), balance + delta);
    }

    /// Debits on a frozen wallet always fail, whatever the amounts.
    #[test]
    fn prop_frozen_rejects_all_debits(
        balance in balance_strategy(),
        delta in delta_strategy(),
    ) {
        prop_assume!(delta < Decimal::ZERO);

        let mut w = wallet(balance);
        w.is_frozen = true;
        prop_assert!(matches!(
            apply_signed(&w, delta),
            Err(LedgerError::WalletFrozen(_))
        ));
    }

    /// A debit and matching credit on two wallets conserve the total.
    #[test]
    fn prop_transfer_conserves_total(
        sender_balance in balance_strategy(),
        recipient_balance in balance_strategy(),
        amount in (1i64..1_000_000_00i64).prop_map(|n| Decimal::new(n, 2)),
    ) {
        prop_assume!(sender_balance >= amount);

        let sender = wallet(sender_balance);
        let recipient = wallet(recipient_balance);

        let new_sender = apply_signed(&sender, -amount).unwrap();
        let new_recipient = apply_signed(&recipient, amount).unwrap();

        prop_assert_eq!(
            new_sender + new_recipient,
            sender_balance + recipient_balance
        );
    }
}
