//! `SeaORM` Entity for the mpesa_transactions table.
//!
//! One row per STK-push initiation, keyed by the gateway's
//! `checkout_request_id` so the asynchronous result callback can be matched
//! back to the pending ledger entry it settles.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::MpesaStatus;

/// An STK-push payment request and its reconciliation state.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "mpesa_transactions")]
pub struct Model {
    /// Row ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Paying owner.
    pub owner_id: Uuid,
    /// Phone number in gateway format (2547XXXXXXXX).
    pub phone_number: String,
    /// Requested amount.
    pub amount: Decimal,
    /// Account reference shown on the customer's prompt.
    pub account_reference: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Gateway correlation id; unique.
    pub checkout_request_id: String,
    /// Merchant-side request id.
    pub merchant_request_id: Option<String>,
    /// Receipt number extracted from a successful callback.
    pub mpesa_receipt_number: Option<String>,
    /// Raw result code from the callback.
    pub result_code: Option<String>,
    /// Raw result description from the callback.
    pub result_desc: Option<String>,
    /// Reconciliation status.
    pub status: MpesaStatus,
    /// Pending ledger entry this payment settles.
    pub ledger_entry_id: Uuid,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ledger_entries::Entity",
        from = "Column::LedgerEntryId",
        to = "super::ledger_entries::Column::Id"
    )]
    LedgerEntry,
}

impl Related<super::ledger_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
