//! `SeaORM` Entity for the wallets table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A balance-bearing wallet, one per owner.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    /// Wallet ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Opaque reference to the owner in the external identity layer.
    pub owner_id: Uuid,
    /// System-generated account number, immutable once set.
    pub account_number: String,
    /// Current balance; never negative.
    pub balance: Decimal,
    /// Whether the wallet is active.
    pub is_active: bool,
    /// Whether the wallet is frozen (debits rejected).
    pub is_frozen: bool,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

// Ledger entries reference wallets through two foreign keys (sender and
// recipient); queries join by explicit column filters instead of a single
// Related path.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
