//! Shared domain types.

pub mod account_number;

pub use account_number::AccountNumber;
