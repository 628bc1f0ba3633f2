//! Shared types, errors, and configuration for PesaBank.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and token validation (identity layer is external)
//! - The Daraja (M-Pesa) gateway client
//! - Account-number type

pub mod config;
pub mod daraja;
pub mod error;
pub mod jwt;
pub mod types;

pub use config::AppConfig;
pub use daraja::{DarajaClient, DarajaError};
pub use error::{AppError, AppResult};
pub use jwt::{Claims, JwtError, JwtService};
