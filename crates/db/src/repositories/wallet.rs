//! Wallet repository.
//!
//! Wallets are created exactly once per owner, by the registration
//! workflow invoking the owner-created hook. Balance mutation never happens
//! here; that is the ledger repository's job.

use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use tracing::info;
use uuid::Uuid;

use pesabank_shared::types::account_number::ACCOUNT_NUMBER_LEN;

use crate::entities::wallets;

/// Attempts at generating a unique account number before giving up.
const ACCOUNT_NUMBER_ATTEMPTS: usize = 5;

/// Error types for wallet operations.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// Wallet not found.
    #[error("Wallet not found for owner {0}")]
    NotFound(Uuid),

    /// Could not allocate a unique account number.
    #[error("Could not allocate a unique account number")]
    AccountNumberExhausted,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Wallet repository.
#[derive(Debug, Clone)]
pub struct WalletRepository {
    db: DatabaseConnection,
}

impl WalletRepository {
    /// Creates a new wallet repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates the wallet for a freshly registered owner.
    ///
    /// Called synchronously by the registration workflow. Idempotent: if
    /// the owner already has a wallet it is returned unchanged, so a
    /// retried registration cannot create a second one.
    ///
    /// # Errors
    ///
    /// Returns an error if a unique account number cannot be allocated or
    /// the database operation fails.
    pub async fn on_owner_created(&self, owner_id: Uuid) -> Result<wallets::Model, WalletError> {
        if let Some(existing) = self.find_by_owner(owner_id).await? {
            return Ok(existing);
        }

        for _ in 0..ACCOUNT_NUMBER_ATTEMPTS {
            let account_number = generate_account_number();

            let taken = wallets::Entity::find()
                .filter(wallets::Column::AccountNumber.eq(&account_number))
                .one(&self.db)
                .await?
                .is_some();
            if taken {
                continue;
            }

            let now = Utc::now().into();
            let wallet = wallets::ActiveModel {
                id: Set(Uuid::new_v4()),
                owner_id: Set(owner_id),
                account_number: Set(account_number),
                balance: Set(Decimal::ZERO),
                is_active: Set(true),
                is_frozen: Set(false),
                created_at: Set(now),
                updated_at: Set(now),
            };

            let wallet = wallet.insert(&self.db).await?;
            info!(owner_id = %owner_id, wallet_id = %wallet.id, "Wallet created");
            return Ok(wallet);
        }

        Err(WalletError::AccountNumberExhausted)
    }

    /// Finds a wallet by its owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Option<wallets::Model>, WalletError> {
        let wallet = wallets::Entity::find()
            .filter(wallets::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?;
        Ok(wallet)
    }

    /// Finds a wallet by its account number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_account_number(
        &self,
        account_number: &str,
    ) -> Result<Option<wallets::Model>, WalletError> {
        let wallet = wallets::Entity::find()
            .filter(wallets::Column::AccountNumber.eq(account_number))
            .one(&self.db)
            .await?;
        Ok(wallet)
    }
}

/// Generates a ten-digit account number with a non-zero leading digit.
#[must_use]
fn generate_account_number() -> String {
    let mut rng = rand::rng();
    let mut digits = String::with_capacity(ACCOUNT_NUMBER_LEN);
    digits.push(char::from(b'1' + rng.random_range(0..9u8)));
    for _ in 1..ACCOUNT_NUMBER_LEN {
        digits.push(char::from(b'0' + rng.random_range(0..10u8)));
    }
    digits
}

#[cfg(test)]
mod tests {
    use super::*;
    use pesabank_shared::types::AccountNumber;

    #[test]
    fn test_generated_numbers_are_valid() {
        for _ in 0..100 {
            let number = generate_account_number();
            assert!(AccountNumber::parse(&number).is_ok(), "bad number: {number}");
            assert!(!number.starts_with('0'));
        }
    }
}
