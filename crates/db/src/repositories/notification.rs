//! Notification repository.
//!
//! Notifications are informational fan-out; ledger operations never block
//! on them, and a failed insert is logged and swallowed by the caller.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{notifications, sea_orm_active_enums::NotificationKind};

/// Error types for notification operations.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// Notification not found.
    #[error("Notification not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Notification repository.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    db: DatabaseConnection,
}

impl NotificationRepository {
    /// Creates a new notification repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a notification for an owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails; callers on the ledger path
    /// log and ignore it.
    pub async fn create(
        &self,
        owner_id: Uuid,
        kind: NotificationKind,
        message: String,
    ) -> Result<notifications::Model, NotificationError> {
        let row = notifications::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            kind: Set(kind),
            message: Set(message),
            is_read: Set(false),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await?;
        Ok(row)
    }

    /// Lists an owner's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        owner_id: Uuid,
        unread_only: bool,
    ) -> Result<Vec<notifications::Model>, NotificationError> {
        let mut query = notifications::Entity::find()
            .filter(notifications::Column::OwnerId.eq(owner_id))
            .order_by_desc(notifications::Column::CreatedAt);

        if unread_only {
            query = query.filter(notifications::Column::IsRead.eq(false));
        }

        let rows = query.all(&self.db).await?;
        Ok(rows)
    }

    /// Marks one of the owner's notifications as read.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the notification does not exist or belongs to
    /// another owner.
    pub async fn mark_read(
        &self,
        owner_id: Uuid,
        notification_id: Uuid,
    ) -> Result<notifications::Model, NotificationError> {
        let row = notifications::Entity::find_by_id(notification_id)
            .filter(notifications::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?
            .ok_or(NotificationError::NotFound(notification_id))?;

        let mut active: notifications::ActiveModel = row.into();
        active.is_read = Set(true);
        let updated = active.update(&self.db).await?;
        Ok(updated)
    }
}
