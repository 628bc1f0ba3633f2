//! `SeaORM` Entity for the ledger_entries table.
//!
//! Entries are append-only. The only permitted update is the status
//! transition of a pending external-payment entry upon reconciliation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{EntryStatus, EntryType};

/// One immutable ledger record of a balance-affecting event.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    /// Entry ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Entry kind.
    pub entry_type: EntryType,
    /// Entry status.
    pub status: EntryStatus,
    /// Positive amount moved by this entry.
    pub amount: Decimal,
    /// Debited wallet, if any.
    pub sender_wallet_id: Option<Uuid>,
    /// Credited wallet, if any.
    pub recipient_wallet_id: Option<Uuid>,
    /// Free-text description.
    pub description: Option<String>,
    /// Creation timestamp; set once, never edited.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::SenderWalletId",
        to = "super::wallets::Column::Id"
    )]
    SenderWallet,
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::RecipientWalletId",
        to = "super::wallets::Column::Id"
    )]
    RecipientWallet,
}

impl ActiveModelBehavior for ActiveModel {}
