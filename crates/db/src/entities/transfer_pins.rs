//! `SeaORM` Entity for the transfer_pins table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Hashed transfer PIN, bound 1:1 to an owner.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transfer_pins")]
pub struct Model {
    /// Owner this PIN belongs to.
    #[sea_orm(primary_key, auto_increment = false)]
    pub owner_id: Uuid,
    /// Argon2id hash in PHC string format; the plaintext is never stored.
    pub pin_hash: String,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
