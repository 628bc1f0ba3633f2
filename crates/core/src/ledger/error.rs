//! Ledger error types.
//!
//! Every ledger operation failure maps to one of these variants. Messages
//! never include amounts or PINs.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Amount cannot be zero.
    #[error("Amount cannot be zero")]
    ZeroAmount,

    /// Amount cannot be negative.
    #[error("Amount cannot be negative")]
    NegativeAmount,

    /// Amount has more than two decimal places.
    #[error("Amount must have at most two decimal places")]
    AmountPrecision,

    /// Sender and recipient are the same owner.
    #[error("Cannot transfer to your own wallet")]
    SelfTransfer,

    /// PIN is not a 4-digit number.
    #[error("PIN must be a 4-digit number")]
    InvalidPinFormat,

    // ========== Authorization Errors ==========
    /// Transfer PIN did not match.
    #[error("Invalid transfer PIN")]
    InvalidPin,

    /// No transfer PIN has been set for this owner.
    #[error("Transfer PIN has not been set")]
    PinNotSet,

    // ========== Not Found Errors ==========
    /// Wallet not found.
    #[error("Wallet not found: {0}")]
    WalletNotFound(Uuid),

    /// No wallet exists for this owner.
    #[error("No wallet exists for owner {0}")]
    OwnerWalletNotFound(Uuid),

    /// Recipient account number did not resolve to a wallet.
    #[error("Recipient account not found")]
    RecipientNotFound,

    // ========== Conflict Errors ==========
    /// A debit would make the balance negative.
    #[error("Insufficient balance")]
    InsufficientFunds,

    /// Wallet is frozen and cannot be debited.
    #[error("Wallet {0} is frozen")]
    WalletFrozen(Uuid),

    /// Wallet is inactive.
    #[error("Wallet {0} is inactive")]
    WalletInactive(Uuid),

    /// Lock acquisition timed out; the caller may retry.
    #[error("Wallet is busy, please retry")]
    LockContention,

    // ========== Storage Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::AmountPrecision => "AMOUNT_PRECISION",
            Self::SelfTransfer => "SELF_TRANSFER",
            Self::InvalidPinFormat => "INVALID_PIN_FORMAT",
            Self::InvalidPin => "INVALID_PIN",
            Self::PinNotSet => "PIN_NOT_SET",
            Self::WalletNotFound(_) => "WALLET_NOT_FOUND",
            Self::OwnerWalletNotFound(_) => "OWNER_WALLET_NOT_FOUND",
            Self::RecipientNotFound => "RECIPIENT_NOT_FOUND",
            Self::InsufficientFunds => "INSUFFICIENT_FUNDS",
            Self::WalletFrozen(_) => "WALLET_FROZEN",
            Self::WalletInactive(_) => "WALLET_INACTIVE",
            Self::LockContention => "LOCK_CONTENTION",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::ZeroAmount
            | Self::NegativeAmount
            | Self::AmountPrecision
            | Self::SelfTransfer
            | Self::InvalidPinFormat => 400,

            // 401 Unauthorized - PIN failures are recoverable caller errors
            Self::InvalidPin | Self::PinNotSet => 401,

            // 404 Not Found
            Self::WalletNotFound(_) | Self::OwnerWalletNotFound(_) | Self::RecipientNotFound => {
                404
            }

            // 409 Conflict - retryable after the caller corrects state
            Self::InsufficientFunds
            | Self::WalletFrozen(_)
            | Self::WalletInactive(_)
            | Self::LockContention => 409,

            // 500 Internal Server Error
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns true if this error is retryable without any state change.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockContention)
    }
}

impl From<LedgerError> for pesabank_shared::AppError {
    fn from(e: LedgerError) -> Self {
        use pesabank_shared::AppError;

        let message = e.to_string();
        match e {
            LedgerError::ZeroAmount
            | LedgerError::NegativeAmount
            | LedgerError::AmountPrecision
            | LedgerError::SelfTransfer
            | LedgerError::InvalidPinFormat => AppError::Validation(message),
            LedgerError::InvalidPin | LedgerError::PinNotSet => AppError::Unauthorized(message),
            LedgerError::WalletNotFound(_)
            | LedgerError::OwnerWalletNotFound(_)
            | LedgerError::RecipientNotFound => AppError::NotFound(message),
            LedgerError::InsufficientFunds
            | LedgerError::WalletFrozen(_)
            | LedgerError::WalletInactive(_)
            | LedgerError::LockContention => AppError::Conflict(message),
            LedgerError::Database(inner) => AppError::Database(inner),
            LedgerError::Internal(inner) => AppError::Internal(inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::ZeroAmount.error_code(), "ZERO_AMOUNT");
        assert_eq!(
            LedgerError::InsufficientFunds.error_code(),
            "INSUFFICIENT_FUNDS"
        );
        assert_eq!(LedgerError::InvalidPin.error_code(), "INVALID_PIN");
        assert_eq!(
            LedgerError::RecipientNotFound.error_code(),
            "RECIPIENT_NOT_FOUND"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::ZeroAmount.http_status_code(), 400);
        assert_eq!(LedgerError::InvalidPin.http_status_code(), 401);
        assert_eq!(
            LedgerError::WalletNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(LedgerError::InsufficientFunds.http_status_code(), 409);
        assert_eq!(LedgerError::LockContention.http_status_code(), 409);
        assert_eq!(
            LedgerError::Database("boom".to_string()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(LedgerError::LockContention.is_retryable());
        assert!(!LedgerError::InsufficientFunds.is_retryable());
        assert!(!LedgerError::InvalidPin.is_retryable());
    }

    #[test]
    fn test_app_error_category_preserves_status() {
        use pesabank_shared::AppError;

        let errors = [
            LedgerError::ZeroAmount,
            LedgerError::InvalidPin,
            LedgerError::RecipientNotFound,
            LedgerError::InsufficientFunds,
            LedgerError::Internal("boom".to_string()),
        ];
        for err in errors {
            let status = err.http_status_code();
            let app: AppError = err.into();
            assert_eq!(app.status_code(), status);
        }
    }

    #[test]
    fn test_messages_never_echo_amounts() {
        // Conflict and validation messages are fixed strings.
        assert_eq!(LedgerError::InsufficientFunds.to_string(), "Insufficient balance");
        assert_eq!(LedgerError::InvalidPin.to_string(), "Invalid transfer PIN");
    }
}
