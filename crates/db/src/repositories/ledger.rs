//! Ledger repository: balance mutation and transfers.
//!
//! [`LedgerRepository::apply_delta`] is the single writer of wallet
//! balances. It locks the wallet row (`SELECT ... FOR UPDATE`), asks the
//! pure mutation rules in `pesabank-core` for the new balance, and persists
//! the balance and the matching ledger entry inside the caller's database
//! transaction, so a failure anywhere rolls back everything.

use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use pesabank_core::auth::{validate_pin_format, verify_pin};
use pesabank_core::ledger::{
    EntryKind, EntryStatus as CoreEntryStatus, LedgerError, WalletSnapshot, apply_signed,
    validate_amount,
};

use crate::entities::{
    ledger_entries,
    sea_orm_active_enums::{EntryStatus, EntryType},
    transfer_pins, wallets,
};

/// A new ledger entry to append alongside a balance mutation.
#[derive(Debug, Clone)]
pub struct NewEntry {
    /// Entry kind.
    pub entry_type: EntryType,
    /// Free-text description.
    pub description: Option<String>,
    /// Debited wallet.
    pub sender_wallet_id: Option<Uuid>,
    /// Credited wallet.
    pub recipient_wallet_id: Option<Uuid>,
}

/// How a balance mutation is recorded in the entry log.
#[derive(Debug, Clone)]
pub enum EntryWrite {
    /// Append a new `completed` entry.
    New(NewEntry),
    /// Complete the `pending` entry that already describes this mutation.
    Complete(Uuid),
    /// The entry is written by the other leg of the same transaction.
    OtherLeg,
}

/// Result of a single balance mutation.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    /// Balance after the mutation.
    pub new_balance: Decimal,
    /// The entry recorded for this mutation, if this leg wrote one.
    pub entry_id: Option<Uuid>,
}

/// Result of a completed transfer.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    /// The dual-entry ledger row recording the transfer.
    pub entry_id: Uuid,
    /// Transferred amount.
    pub amount: Decimal,
    /// Sender balance after the debit.
    pub sender_balance: Decimal,
    /// Debited wallet.
    pub sender_wallet_id: Uuid,
    /// Credited wallet.
    pub recipient_wallet_id: Uuid,
    /// Owner of the credited wallet.
    pub recipient_owner_id: Uuid,
}

/// Filter options for listing ledger entries.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Filter by entry kind.
    pub entry_type: Option<EntryKind>,
    /// Minimum amount (inclusive).
    pub min_amount: Option<Decimal>,
    /// Maximum amount (inclusive).
    pub max_amount: Option<Decimal>,
    /// Start date (inclusive).
    pub date_from: Option<NaiveDate>,
    /// End date (inclusive).
    pub date_to: Option<NaiveDate>,
}

/// Ledger repository.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Reads a wallet row under an exclusive lock.
    ///
    /// Callers waiting on a contended row block until the holder commits;
    /// a lock timeout surfaces as the retryable `LockContention`.
    pub(crate) async fn lock_wallet(
        txn: &DatabaseTransaction,
        wallet_id: Uuid,
    ) -> Result<wallets::Model, LedgerError> {
        wallets::Entity::find_by_id(wallet_id)
            .lock_exclusive()
            .one(txn)
            .await
            .map_err(map_db_err)?
            .ok_or(LedgerError::WalletNotFound(wallet_id))
    }

    /// Applies a signed delta to exactly one wallet.
    ///
    /// Must be called inside an open database transaction; the new balance
    /// and the entry record become visible atomically at commit.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientFunds` when a debit would make the balance
    /// negative, `WalletFrozen`/`WalletInactive` for gated debits,
    /// `WalletNotFound`, and validation errors for a zero or over-precise
    /// delta. Any error must abort the enclosing transaction.
    pub async fn apply_delta(
        txn: &DatabaseTransaction,
        wallet_id: Uuid,
        delta: Decimal,
        write: EntryWrite,
    ) -> Result<MutationOutcome, LedgerError> {
        let wallet = Self::lock_wallet(txn, wallet_id).await?;

        let snapshot = WalletSnapshot {
            id: wallet.id,
            balance: wallet.balance,
            is_active: wallet.is_active,
            is_frozen: wallet.is_frozen,
        };
        let new_balance = apply_signed(&snapshot, delta)?;

        let now = Utc::now().into();
        let mut active: wallets::ActiveModel = wallet.into();
        active.balance = Set(new_balance);
        active.updated_at = Set(now);
        active.update(txn).await.map_err(map_db_err)?;

        let entry_id = match write {
            EntryWrite::New(entry) => {
                let entry_id = Uuid::new_v4();
                ledger_entries::ActiveModel {
                    id: Set(entry_id),
                    entry_type: Set(entry.entry_type),
                    status: Set(EntryStatus::Completed),
                    amount: Set(delta.abs()),
                    sender_wallet_id: Set(entry.sender_wallet_id),
                    recipient_wallet_id: Set(entry.recipient_wallet_id),
                    description: Set(entry.description),
                    created_at: Set(now),
                }
                .insert(txn)
                .await
                .map_err(map_db_err)?;
                Some(entry_id)
            }
            EntryWrite::Complete(entry_id) => {
                let entry = ledger_entries::Entity::find_by_id(entry_id)
                    .one(txn)
                    .await
                    .map_err(map_db_err)?
                    .ok_or_else(|| {
                        LedgerError::Internal(format!("pending entry {entry_id} missing"))
                    })?;

                // The only legal status transition is pending -> terminal.
                if CoreEntryStatus::from(entry.status.clone()).is_terminal() {
                    return Err(LedgerError::Internal(format!(
                        "entry {entry_id} is not pending"
                    )));
                }

                let mut active: ledger_entries::ActiveModel = entry.into();
                active.status = Set(EntryStatus::Completed);
                active.update(txn).await.map_err(map_db_err)?;
                Some(entry_id)
            }
            EntryWrite::OtherLeg => None,
        };

        Ok(MutationOutcome {
            new_balance,
            entry_id,
        })
    }

    /// Credits a wallet from outside the ledger.
    ///
    /// # Errors
    ///
    /// Returns validation errors for a bad amount and
    /// `OwnerWalletNotFound` for an unknown owner.
    pub async fn top_up(
        &self,
        owner_id: Uuid,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<MutationOutcome, LedgerError> {
        validate_amount(amount)?;
        let wallet = self.wallet_by_owner(owner_id).await?;

        let txn = self.db.begin().await.map_err(map_db_err)?;
        let outcome = Self::apply_delta(
            &txn,
            wallet.id,
            amount,
            EntryWrite::New(NewEntry {
                entry_type: EntryType::TopUp,
                description,
                sender_wallet_id: None,
                recipient_wallet_id: Some(wallet.id),
            }),
        )
        .await?;
        txn.commit().await.map_err(map_db_err)?;

        Ok(outcome)
    }

    /// Debits a wallet to the outside.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientFunds` when the balance cannot cover the
    /// amount; the balance is left untouched.
    pub async fn withdraw(
        &self,
        owner_id: Uuid,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<MutationOutcome, LedgerError> {
        validate_amount(amount)?;
        let wallet = self.wallet_by_owner(owner_id).await?;

        let txn = self.db.begin().await.map_err(map_db_err)?;
        let outcome = Self::apply_delta(
            &txn,
            wallet.id,
            -amount,
            EntryWrite::New(NewEntry {
                entry_type: EntryType::Withdraw,
                description,
                sender_wallet_id: Some(wallet.id),
                recipient_wallet_id: None,
            }),
        )
        .await?;
        txn.commit().await.map_err(map_db_err)?;

        Ok(outcome)
    }

    /// Moves funds between two wallets as one all-or-nothing operation,
    /// gated by the sender's transfer PIN.
    ///
    /// Both wallet rows are locked in ascending id order so concurrent
    /// opposite-direction transfers cannot deadlock. The transfer is
    /// recorded as a single dual-entry row referencing both wallets.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPin`/`PinNotSet` before any lock is taken,
    /// `RecipientNotFound`, `SelfTransfer`, and `InsufficientFunds` with no
    /// partial state persisted.
    pub async fn transfer(
        &self,
        sender_owner: Uuid,
        recipient_account_number: &str,
        amount: Decimal,
        pin: &str,
        description: Option<String>,
    ) -> Result<TransferOutcome, LedgerError> {
        validate_amount(amount)?;
        validate_pin_format(pin).map_err(|_| LedgerError::InvalidPinFormat)?;

        let pin_row = transfer_pins::Entity::find_by_id(sender_owner)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(LedgerError::PinNotSet)?;
        match verify_pin(pin, &pin_row.pin_hash) {
            Ok(true) => {}
            Ok(false) => return Err(LedgerError::InvalidPin),
            Err(e) => return Err(LedgerError::Internal(e.to_string())),
        }

        let sender = self.wallet_by_owner(sender_owner).await?;
        let recipient = wallets::Entity::find()
            .filter(wallets::Column::AccountNumber.eq(recipient_account_number))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(LedgerError::RecipientNotFound)?;

        if recipient.owner_id == sender_owner {
            return Err(LedgerError::SelfTransfer);
        }

        let txn = self.db.begin().await.map_err(map_db_err)?;

        // Both rows locked up front in a fixed global order; apply_delta
        // re-locks, which is a no-op inside the same transaction.
        let (first, second) = lock_order(sender.id, recipient.id);
        Self::lock_wallet(&txn, first).await?;
        Self::lock_wallet(&txn, second).await?;

        let debit = Self::apply_delta(
            &txn,
            sender.id,
            -amount,
            EntryWrite::New(NewEntry {
                entry_type: EntryType::Transfer,
                description,
                sender_wallet_id: Some(sender.id),
                recipient_wallet_id: Some(recipient.id),
            }),
        )
        .await?;
        Self::apply_delta(&txn, recipient.id, amount, EntryWrite::OtherLeg).await?;

        txn.commit().await.map_err(map_db_err)?;

        let entry_id = debit
            .entry_id
            .ok_or_else(|| LedgerError::Internal("transfer entry not recorded".to_string()))?;

        Ok(TransferOutcome {
            entry_id,
            amount,
            sender_balance: debit.new_balance,
            sender_wallet_id: sender.id,
            recipient_wallet_id: recipient.id,
            recipient_owner_id: recipient.owner_id,
        })
    }

    /// Lists an owner's ledger entries, newest first.
    ///
    /// An entry belongs to the owner's history when their wallet appears on
    /// either side of it.
    ///
    /// # Errors
    ///
    /// Returns `OwnerWalletNotFound` for an unknown owner.
    pub async fn list_entries(
        &self,
        owner_id: Uuid,
        filter: EntryFilter,
    ) -> Result<Vec<ledger_entries::Model>, LedgerError> {
        let wallet = self.wallet_by_owner(owner_id).await?;

        let mut query = ledger_entries::Entity::find().filter(
            Condition::any()
                .add(ledger_entries::Column::SenderWalletId.eq(wallet.id))
                .add(ledger_entries::Column::RecipientWalletId.eq(wallet.id)),
        );

        if let Some(kind) = filter.entry_type {
            query = query.filter(ledger_entries::Column::EntryType.eq(EntryType::from(kind)));
        }
        if let Some(min) = filter.min_amount {
            query = query.filter(ledger_entries::Column::Amount.gte(min));
        }
        if let Some(max) = filter.max_amount {
            query = query.filter(ledger_entries::Column::Amount.lte(max));
        }
        if let Some(from) = filter.date_from {
            let start = from.and_time(NaiveTime::MIN).and_utc();
            query = query.filter(ledger_entries::Column::CreatedAt.gte(start));
        }
        if let Some(to) = filter.date_to {
            let end = to
                .succ_opt()
                .unwrap_or(to)
                .and_time(NaiveTime::MIN)
                .and_utc();
            query = query.filter(ledger_entries::Column::CreatedAt.lt(end));
        }

        query
            .order_by_desc(ledger_entries::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    /// Finds the wallet for an owner.
    pub(crate) async fn wallet_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<wallets::Model, LedgerError> {
        wallets::Entity::find()
            .filter(wallets::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(LedgerError::OwnerWalletNotFound(owner_id))
    }
}

// ============================================================================
// Pure helpers
// ============================================================================

/// Orders two wallet ids into the global lock acquisition order.
///
/// Every multi-wallet operation locks rows in this order, which makes
/// deadlock cycles between concurrent opposite-direction transfers
/// impossible.
#[must_use]
pub fn lock_order(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Maps a database error into the ledger taxonomy.
///
/// Lock-wait timeouts (SQLSTATE 55P03) become the retryable
/// `LockContention`; everything else is a storage failure.
pub(crate) fn map_db_err(e: DbErr) -> LedgerError {
    let text = e.to_string();
    if text.contains("55P03") || text.contains("lock timeout") {
        LedgerError::LockContention
    } else {
        LedgerError::Database(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_order_is_deterministic() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);

        assert_eq!(lock_order(a, b), (a, b));
        assert_eq!(lock_order(b, a), (a, b));
    }

    #[test]
    fn test_lock_order_same_id() {
        let a = Uuid::from_u128(7);
        assert_eq!(lock_order(a, a), (a, a));
    }

    #[test]
    fn test_map_db_err_lock_timeout() {
        let err = map_db_err(DbErr::Custom(
            "error returned from database: 55P03: canceling statement due to lock timeout"
                .to_string(),
        ));
        assert!(matches!(err, LedgerError::LockContention));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_map_db_err_other() {
        let err = map_db_err(DbErr::Custom("connection reset".to_string()));
        assert!(matches!(err, LedgerError::Database(_)));
        assert!(!err.is_retryable());
    }
}
