//! Loan repository: eligibility scoring, disbursement, and repayment.
//!
//! Disbursement and repayment move money exclusively through the ledger
//! repository's balance mutator, inside the same database transaction as
//! the loan row change.

use chrono::{Days, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use pesabank_core::ledger::{LedgerError, validate_amount};
use pesabank_core::loan::{
    LOAN_TERM_DAYS, LoanPolicy, LoanStatus as CoreLoanStatus, ScoreInputs, total_due,
};

use crate::entities::{
    ledger_entries, loans,
    sea_orm_active_enums::{EntryStatus, EntryType, LoanStatus},
    wallets,
};
use crate::repositories::ledger::{EntryWrite, LedgerRepository, NewEntry, map_db_err};

/// Error types for loan operations.
#[derive(Debug, thiserror::Error)]
pub enum LoanError {
    /// Score below the approval threshold.
    #[error("Not eligible for a loan")]
    NotEligible {
        /// The score the application received.
        score: u8,
    },

    /// The owner already holds an approved loan.
    #[error("An approved loan is already outstanding")]
    ActiveLoanExists,

    /// Loan not found.
    #[error("Loan not found: {0}")]
    NotFound(Uuid),

    /// Loan is not in a repayable state.
    #[error("Loan is not repayable")]
    NotRepayable,

    /// Interest rate is negative.
    #[error("Interest rate cannot be negative")]
    InvalidRate,

    /// Ledger operation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Loan repository.
#[derive(Debug, Clone)]
pub struct LoanRepository {
    db: DatabaseConnection,
    policy: LoanPolicy,
}

impl LoanRepository {
    /// Creates a new loan repository with the given scoring policy.
    #[must_use]
    pub const fn new(db: DatabaseConnection, policy: LoanPolicy) -> Self {
        Self { db, policy }
    }

    /// Scores an owner's creditworthiness.
    ///
    /// The verified-identity flag comes from the identity layer's claims;
    /// balance and history come from the ledger.
    ///
    /// # Errors
    ///
    /// Returns `Ledger(OwnerWalletNotFound)` for an unknown owner.
    pub async fn score(&self, owner_id: Uuid, identity_verified: bool) -> Result<u8, LoanError> {
        let inputs = self.score_inputs(owner_id, identity_verified).await?;
        Ok(self.policy.score(&inputs))
    }

    /// Applies for a loan.
    ///
    /// On approval the loan row is created with its total due frozen, and
    /// the principal is credited to the owner's wallet in the same atomic
    /// unit. A rejection creates no row and moves no money.
    ///
    /// # Errors
    ///
    /// Returns `NotEligible { score }` below the approval threshold,
    /// `ActiveLoanExists` when an approved loan is outstanding, and
    /// validation errors for a bad principal or rate.
    pub async fn apply(
        &self,
        owner_id: Uuid,
        identity_verified: bool,
        principal: Decimal,
        interest_rate: Decimal,
    ) -> Result<loans::Model, LoanError> {
        validate_amount(principal).map_err(LoanError::Ledger)?;
        if interest_rate < Decimal::ZERO {
            return Err(LoanError::InvalidRate);
        }

        let inputs = self.score_inputs(owner_id, identity_verified).await?;
        let score = self.policy.score(&inputs);
        if !self.policy.is_eligible(score) {
            return Err(LoanError::NotEligible { score });
        }

        let outstanding = loans::Entity::find()
            .filter(loans::Column::OwnerId.eq(owner_id))
            .filter(loans::Column::Status.eq(LoanStatus::Approved))
            .one(&self.db)
            .await?;
        if outstanding.is_some() {
            return Err(LoanError::ActiveLoanExists);
        }

        let wallet = self.wallet_by_owner(owner_id).await?;

        let now = Utc::now();
        #[allow(clippy::cast_sign_loss)]
        let due_date = now
            .date_naive()
            .checked_add_days(Days::new(LOAN_TERM_DAYS as u64))
            .unwrap_or_else(|| now.date_naive());

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let loan = loans::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            principal: Set(principal),
            interest_rate: Set(interest_rate),
            total_due: Set(total_due(principal, interest_rate)),
            status: Set(LoanStatus::Approved),
            score: Set(i16::from(score)),
            applied_at: Set(now.into()),
            due_date: Set(due_date),
        }
        .insert(&txn)
        .await?;

        LedgerRepository::apply_delta(
            &txn,
            wallet.id,
            principal,
            EntryWrite::New(NewEntry {
                entry_type: EntryType::TopUp,
                description: Some("Loan disbursement".to_string()),
                sender_wallet_id: None,
                recipient_wallet_id: Some(wallet.id),
            }),
        )
        .await?;

        txn.commit().await.map_err(map_db_err)?;
        info!(owner_id = %owner_id, loan_id = %loan.id, score, "Loan disbursed");

        Ok(loan)
    }

    /// Repays an approved loan in full.
    ///
    /// Debits the frozen total due and flips the loan to `repaid`,
    /// atomically.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `NotRepayable` for a non-approved loan, and
    /// `Ledger(InsufficientFunds)` when the balance cannot cover the total
    /// due.
    pub async fn repay(&self, owner_id: Uuid, loan_id: Uuid) -> Result<loans::Model, LoanError> {
        let loan = loans::Entity::find_by_id(loan_id)
            .filter(loans::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?
            .ok_or(LoanError::NotFound(loan_id))?;

        if !CoreLoanStatus::from(loan.status.clone()).is_repayable() {
            return Err(LoanError::NotRepayable);
        }

        let wallet = self.wallet_by_owner(owner_id).await?;

        let txn = self.db.begin().await.map_err(map_db_err)?;

        LedgerRepository::apply_delta(
            &txn,
            wallet.id,
            -loan.total_due,
            EntryWrite::New(NewEntry {
                entry_type: EntryType::Withdraw,
                description: Some("Loan repayment".to_string()),
                sender_wallet_id: Some(wallet.id),
                recipient_wallet_id: None,
            }),
        )
        .await?;

        let mut active: loans::ActiveModel = loan.into();
        active.status = Set(LoanStatus::Repaid);
        let repaid = active.update(&txn).await?;

        txn.commit().await.map_err(map_db_err)?;
        info!(owner_id = %owner_id, loan_id = %loan_id, "Loan repaid");

        Ok(repaid)
    }

    /// Lists an owner's loans, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<loans::Model>, LoanError> {
        let loans = loans::Entity::find()
            .filter(loans::Column::OwnerId.eq(owner_id))
            .order_by_desc(loans::Column::AppliedAt)
            .all(&self.db)
            .await?;
        Ok(loans)
    }

    /// Gathers the scoring inputs for an owner.
    async fn score_inputs(
        &self,
        owner_id: Uuid,
        identity_verified: bool,
    ) -> Result<ScoreInputs, LoanError> {
        let wallet = self.wallet_by_owner(owner_id).await?;

        let completed_entries = ledger_entries::Entity::find()
            .filter(
                Condition::any()
                    .add(ledger_entries::Column::SenderWalletId.eq(wallet.id))
                    .add(ledger_entries::Column::RecipientWalletId.eq(wallet.id)),
            )
            .filter(ledger_entries::Column::Status.eq(EntryStatus::Completed))
            .count(&self.db)
            .await?;

        Ok(ScoreInputs {
            identity_verified,
            balance: wallet.balance,
            completed_entries,
        })
    }

    async fn wallet_by_owner(&self, owner_id: Uuid) -> Result<wallets::Model, LoanError> {
        wallets::Entity::find()
            .filter(wallets::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?
            .ok_or(LoanError::Ledger(LedgerError::OwnerWalletNotFound(owner_id)))
    }
}
