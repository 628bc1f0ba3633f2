//! `SeaORM` Entity for the loans table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::LoanStatus;

/// A loan application and its outcome.
///
/// `total_due` is computed once at creation and frozen; repayment debits
/// exactly this amount. A partial unique index allows at most one approved
/// loan per owner.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    /// Loan ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Borrowing owner.
    pub owner_id: Uuid,
    /// Disbursed principal.
    pub principal: Decimal,
    /// Interest rate in percent.
    pub interest_rate: Decimal,
    /// Principal plus interest, frozen at creation.
    pub total_due: Decimal,
    /// Loan status.
    pub status: LoanStatus,
    /// Eligibility score at application time (0-100).
    pub score: i16,
    /// Application timestamp.
    pub applied_at: DateTimeWithTimeZone,
    /// Repayment due date.
    pub due_date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
