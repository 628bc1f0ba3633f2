//! Wallet ledger domain logic.
//!
//! This module implements the rules of the wallet ledger core:
//! - Entry kinds and statuses for the append-only transaction log
//! - Amount validation (positive, two decimal places)
//! - Balance mutation rules (non-negative balances, frozen/inactive gates)
//! - Error types for ledger operations

pub mod error;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::LedgerError;
pub use types::{EntryKind, EntryStatus, WalletSnapshot};
pub use validation::{apply_signed, validate_amount};
