//! Database enum mappings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use pesabank_core::ledger::{EntryKind, EntryStatus as CoreEntryStatus};
use pesabank_core::loan::LoanStatus as CoreLoanStatus;

/// Kind of ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_type")]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    /// Funds credited from outside the ledger.
    #[sea_orm(string_value = "top_up")]
    TopUp,
    /// Funds debited to the outside.
    #[sea_orm(string_value = "withdraw")]
    Withdraw,
    /// Funds moved between two wallets.
    #[sea_orm(string_value = "transfer")]
    Transfer,
}

/// Status of a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_status")]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Awaiting external confirmation.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Applied to the wallet balance.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Confirmed failed; no balance effect.
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// Loan lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "loan_status")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// Application received, not yet decided.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Disbursed and outstanding.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Application declined.
    #[sea_orm(string_value = "rejected")]
    Rejected,
    /// Fully repaid.
    #[sea_orm(string_value = "repaid")]
    Repaid,
}

/// M-Pesa transaction status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "mpesa_status")]
#[serde(rename_all = "lowercase")]
pub enum MpesaStatus {
    /// STK push sent, awaiting the result callback.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Payment confirmed and credited.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Payment failed.
    #[sea_orm(string_value = "failed")]
    Failed,
    /// Prompt cancelled by the customer.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Notification kind.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "notification_kind")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Balance fell below the low-balance threshold.
    #[sea_orm(string_value = "low_balance")]
    LowBalance,
    /// A loan is due for repayment.
    #[sea_orm(string_value = "loan_due")]
    LoanDue,
    /// A deposit was credited.
    #[sea_orm(string_value = "deposit_success")]
    DepositSuccess,
    /// A transfer arrived from another wallet.
    #[sea_orm(string_value = "transfer_received")]
    TransferReceived,
}

impl From<EntryKind> for EntryType {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::TopUp => Self::TopUp,
            EntryKind::Withdraw => Self::Withdraw,
            EntryKind::Transfer => Self::Transfer,
        }
    }
}

impl From<EntryType> for EntryKind {
    fn from(kind: EntryType) -> Self {
        match kind {
            EntryType::TopUp => Self::TopUp,
            EntryType::Withdraw => Self::Withdraw,
            EntryType::Transfer => Self::Transfer,
        }
    }
}

impl From<EntryStatus> for CoreEntryStatus {
    fn from(status: EntryStatus) -> Self {
        match status {
            EntryStatus::Pending => Self::Pending,
            EntryStatus::Completed => Self::Completed,
            EntryStatus::Failed => Self::Failed,
        }
    }
}

impl From<LoanStatus> for CoreLoanStatus {
    fn from(status: LoanStatus) -> Self {
        match status {
            LoanStatus::Pending => Self::Pending,
            LoanStatus::Approved => Self::Approved,
            LoanStatus::Rejected => Self::Rejected,
            LoanStatus::Repaid => Self::Repaid,
        }
    }
}
