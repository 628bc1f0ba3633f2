//! `SeaORM` entity definitions.

pub mod ledger_entries;
pub mod loans;
pub mod mpesa_transactions;
pub mod notifications;
pub mod sea_orm_active_enums;
pub mod transfer_pins;
pub mod wallets;
