//! Transfer PIN repository.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set};
use uuid::Uuid;

use pesabank_core::auth::{PinError, hash_pin, verify_pin};
use pesabank_core::ledger::LedgerError;

use crate::entities::transfer_pins;

/// Error types for PIN operations.
#[derive(Debug, thiserror::Error)]
pub enum TransferPinError {
    /// PIN is not a 4-digit number.
    #[error("PIN must be a 4-digit number")]
    InvalidFormat,

    /// Hashing failed.
    #[error("PIN hashing failed: {0}")]
    Hashing(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PinError> for TransferPinError {
    fn from(e: PinError) -> Self {
        match e {
            PinError::InvalidFormat => Self::InvalidFormat,
            other => Self::Hashing(other.to_string()),
        }
    }
}

/// Transfer PIN repository.
#[derive(Debug, Clone)]
pub struct TransferPinRepository {
    db: DatabaseConnection,
}

impl TransferPinRepository {
    /// Creates a new PIN repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Sets or replaces the owner's transfer PIN.
    ///
    /// The plaintext PIN is validated, hashed with Argon2id, and discarded.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` for a malformed PIN.
    pub async fn set_pin(&self, owner_id: Uuid, pin: &str) -> Result<(), TransferPinError> {
        let pin_hash = hash_pin(pin)?;
        let now = Utc::now().into();

        let existing = transfer_pins::Entity::find_by_id(owner_id)
            .one(&self.db)
            .await?;

        match existing {
            Some(row) => {
                let mut active: transfer_pins::ActiveModel = row.into();
                active.pin_hash = Set(pin_hash);
                active.updated_at = Set(now);
                active.update(&self.db).await?;
            }
            None => {
                transfer_pins::ActiveModel {
                    owner_id: Set(owner_id),
                    pin_hash: Set(pin_hash),
                    updated_at: Set(now),
                }
                .insert(&self.db)
                .await?;
            }
        }

        Ok(())
    }

    /// Verifies a PIN against the owner's stored hash.
    ///
    /// # Errors
    ///
    /// Returns `PinNotSet` if the owner has no PIN and `InvalidPin` on
    /// mismatch, both in the ledger taxonomy so transfer callers can pass
    /// them through unchanged.
    pub async fn verify(&self, owner_id: Uuid, pin: &str) -> Result<(), LedgerError> {
        let row = transfer_pins::Entity::find_by_id(owner_id)
            .one(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?
            .ok_or(LedgerError::PinNotSet)?;

        match verify_pin(pin, &row.pin_hash) {
            Ok(true) => Ok(()),
            Ok(false) => Err(LedgerError::InvalidPin),
            Err(e) => Err(LedgerError::Internal(e.to_string())),
        }
    }
}
