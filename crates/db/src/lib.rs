//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for wallets, ledger entries, loans,
//!   M-Pesa transactions, and notifications
//! - Repository abstractions for data access
//! - Database migrations
//!
//! All wallet balance mutation goes through
//! [`repositories::ledger::LedgerRepository::apply_delta`], which locks the
//! wallet row for the read-modify-write. No other code writes balances.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    LedgerRepository, LoanRepository, MpesaRepository, NotificationRepository,
    TransferPinRepository, WalletRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
