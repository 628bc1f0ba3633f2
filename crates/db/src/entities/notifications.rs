//! `SeaORM` Entity for the notifications table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::NotificationKind;

/// A notification delivered to an owner's inbox.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    /// Notification ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Receiving owner.
    pub owner_id: Uuid,
    /// Notification kind.
    pub kind: NotificationKind,
    /// Human-readable message.
    pub message: String,
    /// Whether the owner has read it.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
