//! M-Pesa reconciliation repository.
//!
//! Records STK-push initiations as a pending mpesa row plus a linked
//! pending ledger entry, and reconciles the gateway's asynchronous result
//! callback into the ledger exactly once.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use pesabank_core::ledger::{LedgerError, validate_amount};

use crate::entities::{
    ledger_entries, mpesa_transactions,
    sea_orm_active_enums::{EntryStatus, EntryType, MpesaStatus},
    wallets,
};
use crate::repositories::ledger::{EntryWrite, LedgerRepository, NewEntry, map_db_err};

/// Error types for M-Pesa operations.
#[derive(Debug, thiserror::Error)]
pub enum MpesaError {
    /// No pending transaction matches the checkout id.
    #[error("Unknown checkout request id")]
    UnknownCheckoutId,

    /// Ledger operation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording an initiated STK push.
#[derive(Debug, Clone)]
pub struct RecordStkPushInput {
    /// Paying owner.
    pub owner_id: Uuid,
    /// Phone number in gateway format.
    pub phone_number: String,
    /// Requested amount.
    pub amount: Decimal,
    /// Account reference shown on the prompt.
    pub account_reference: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Gateway correlation id.
    pub checkout_request_id: String,
    /// Merchant-side request id.
    pub merchant_request_id: Option<String>,
}

/// Outcome of a reconciliation.
#[derive(Debug, Clone)]
pub enum Reconciliation {
    /// Payment confirmed; the wallet was credited.
    Completed {
        /// Credited owner.
        owner_id: Uuid,
        /// Credited amount.
        amount: Decimal,
    },
    /// Payment failed; nothing was credited.
    Failed {
        /// Owning owner.
        owner_id: Uuid,
    },
    /// The callback was a duplicate; nothing changed.
    AlreadyProcessed,
}

/// M-Pesa repository.
#[derive(Debug, Clone)]
pub struct MpesaRepository {
    db: DatabaseConnection,
}

impl MpesaRepository {
    /// Creates a new M-Pesa repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an accepted STK push: one pending mpesa row and one pending
    /// top-up entry, linked, in a single transaction.
    ///
    /// # Errors
    ///
    /// Returns `Ledger(OwnerWalletNotFound)` for an unknown owner and
    /// validation errors for a bad amount.
    pub async fn record_stk_push(
        &self,
        input: RecordStkPushInput,
    ) -> Result<mpesa_transactions::Model, MpesaError> {
        validate_amount(input.amount).map_err(MpesaError::Ledger)?;

        let wallet = wallets::Entity::find()
            .filter(wallets::Column::OwnerId.eq(input.owner_id))
            .one(&self.db)
            .await?
            .ok_or(MpesaError::Ledger(LedgerError::OwnerWalletNotFound(
                input.owner_id,
            )))?;

        let now = Utc::now().into();
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let entry_id = Uuid::new_v4();
        ledger_entries::ActiveModel {
            id: Set(entry_id),
            entry_type: Set(EntryType::TopUp),
            status: Set(EntryStatus::Pending),
            amount: Set(input.amount),
            sender_wallet_id: Set(None),
            recipient_wallet_id: Set(Some(wallet.id)),
            description: Set(input.description.clone()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let row = mpesa_transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(input.owner_id),
            phone_number: Set(input.phone_number),
            amount: Set(input.amount),
            account_reference: Set(input.account_reference),
            description: Set(input.description),
            checkout_request_id: Set(input.checkout_request_id),
            merchant_request_id: Set(input.merchant_request_id),
            mpesa_receipt_number: Set(None),
            result_code: Set(None),
            result_desc: Set(None),
            status: Set(MpesaStatus::Pending),
            ledger_entry_id: Set(entry_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await.map_err(map_db_err)?;
        info!(
            owner_id = %row.owner_id,
            checkout_request_id = %row.checkout_request_id,
            "STK push recorded"
        );

        Ok(row)
    }

    /// Reconciles an asynchronous result callback into the ledger.
    ///
    /// Idempotent: the mpesa row is locked and re-checked inside the
    /// transaction, so a duplicate callback for an already-settled checkout
    /// id is a no-op success, never a double credit.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCheckoutId` when no transaction matches; the
    /// external system is the source of truth for id uniqueness, so this is
    /// logged and not retried.
    pub async fn reconcile(
        &self,
        checkout_request_id: &str,
        result_code: i64,
        result_desc: Option<String>,
        receipt_number: Option<String>,
    ) -> Result<Reconciliation, MpesaError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let row = mpesa_transactions::Entity::find()
            .filter(mpesa_transactions::Column::CheckoutRequestId.eq(checkout_request_id))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(MpesaError::UnknownCheckoutId)?;

        if row.status != MpesaStatus::Pending {
            warn!(
                checkout_request_id = %checkout_request_id,
                status = ?row.status,
                "Duplicate callback ignored"
            );
            return Ok(Reconciliation::AlreadyProcessed);
        }

        let owner_id = row.owner_id;
        let amount = row.amount;
        let entry_id = row.ledger_entry_id;
        let success = result_code == 0;

        if success {
            let wallet = wallets::Entity::find()
                .filter(wallets::Column::OwnerId.eq(owner_id))
                .one(&txn)
                .await
                .map_err(map_db_err)?
                .ok_or(MpesaError::Ledger(LedgerError::OwnerWalletNotFound(owner_id)))?;

            LedgerRepository::apply_delta(&txn, wallet.id, amount, EntryWrite::Complete(entry_id))
                .await?;
        } else {
            let entry = ledger_entries::Entity::find_by_id(entry_id)
                .one(&txn)
                .await
                .map_err(map_db_err)?
                .ok_or_else(|| {
                    MpesaError::Ledger(LedgerError::Internal(format!(
                        "pending entry {entry_id} missing"
                    )))
                })?;
            let mut active: ledger_entries::ActiveModel = entry.into();
            active.status = Set(EntryStatus::Failed);
            active.update(&txn).await?;
        }

        let mut active: mpesa_transactions::ActiveModel = row.into();
        active.status = Set(reconciled_status(result_code));
        active.result_code = Set(Some(result_code.to_string()));
        active.result_desc = Set(result_desc);
        active.mpesa_receipt_number = Set(receipt_number);
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await?;

        txn.commit().await.map_err(map_db_err)?;

        if success {
            info!(checkout_request_id = %checkout_request_id, "Payment reconciled");
            Ok(Reconciliation::Completed { owner_id, amount })
        } else {
            info!(
                checkout_request_id = %checkout_request_id,
                result_code,
                "Payment marked failed"
            );
            Ok(Reconciliation::Failed { owner_id })
        }
    }
}

/// Result code the gateway sends when the customer dismisses the prompt.
const RESULT_CODE_CANCELLED: i64 = 1032;

/// Terminal mpesa status for a reconciliation result code.
#[must_use]
fn reconciled_status(result_code: i64) -> MpesaStatus {
    match result_code {
        0 => MpesaStatus::Completed,
        RESULT_CODE_CANCELLED => MpesaStatus::Cancelled,
        _ => MpesaStatus::Failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconciled_status() {
        assert_eq!(reconciled_status(0), MpesaStatus::Completed);
        assert_eq!(reconciled_status(1032), MpesaStatus::Cancelled);
        assert_eq!(reconciled_status(1), MpesaStatus::Failed);
        assert_eq!(reconciled_status(2001), MpesaStatus::Failed);
    }
}
