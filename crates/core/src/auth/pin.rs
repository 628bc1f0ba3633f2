//! Transfer-PIN hashing with Argon2id.
//!
//! PINs authorize outbound transfers. They are exactly four digits and are
//! stored only as Argon2id hashes, never in plaintext.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Required PIN length.
pub const PIN_LEN: usize = 4;

/// Errors that can occur during PIN operations.
#[derive(Debug, Error)]
pub enum PinError {
    /// PIN is not exactly four digits.
    #[error("PIN must be a 4-digit number")]
    InvalidFormat,

    /// Failed to hash PIN.
    #[error("failed to hash PIN: {0}")]
    HashError(String),

    /// Failed to verify PIN.
    #[error("failed to verify PIN: {0}")]
    VerifyError(String),

    /// Invalid PIN hash format.
    #[error("invalid PIN hash format")]
    InvalidHash,
}

/// Validates the PIN format: exactly four ASCII digits.
///
/// # Errors
///
/// Returns `PinError::InvalidFormat` otherwise. The PIN value itself is
/// never included in the error.
pub fn validate_pin_format(pin: &str) -> Result<(), PinError> {
    if pin.len() == PIN_LEN && pin.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(PinError::InvalidFormat)
    }
}

/// Hashes a transfer PIN using Argon2id.
///
/// The format is validated before hashing.
///
/// # Errors
///
/// Returns `PinError::InvalidFormat` for malformed PINs and
/// `PinError::HashError` if hashing fails.
pub fn hash_pin(pin: &str) -> Result<String, PinError> {
    validate_pin_format(pin)?;

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(pin.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PinError::HashError(e.to_string()))
}

/// Verifies a transfer PIN against a stored hash.
///
/// # Errors
///
/// Returns `PinError::InvalidHash` if the stored hash is malformed and
/// `PinError::VerifyError` if verification fails unexpectedly.
pub fn verify_pin(pin: &str, hash: &str) -> Result<bool, PinError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PinError::InvalidHash)?;

    let argon2 = Argon2::default();

    match argon2.verify_password(pin.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PinError::VerifyError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0000")]
    #[case("4821")]
    #[case("9999")]
    fn test_pin_format_valid(#[case] pin: &str) {
        assert!(validate_pin_format(pin).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("123")]
    #[case("12345")]
    #[case("12a4")]
    #[case("١٢٣٤")]
    fn test_pin_format_rejected(#[case] pin: &str) {
        assert!(matches!(
            validate_pin_format(pin),
            Err(PinError::InvalidFormat)
        ));
    }

    #[test]
    fn test_hash_pin() {
        let hash = hash_pin("4821").unwrap();

        // Hash should be in PHC format
        assert!(hash.starts_with("$argon2id$"));
        assert_ne!(hash, "4821");
    }

    #[test]
    fn test_hash_rejects_malformed_pin() {
        assert!(matches!(hash_pin("12345"), Err(PinError::InvalidFormat)));
    }

    #[test]
    fn test_verify_correct_pin() {
        let hash = hash_pin("4821").unwrap();
        assert!(verify_pin("4821", &hash).unwrap());
    }

    #[test]
    fn test_verify_wrong_pin() {
        let hash = hash_pin("4821").unwrap();
        assert!(!verify_pin("0000", &hash).unwrap());
    }

    #[test]
    fn test_same_pin_different_hashes() {
        let hash1 = hash_pin("4821").unwrap();
        let hash2 = hash_pin("4821").unwrap();

        // Same PIN should produce different hashes (due to random salt)
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = verify_pin("4821", "not-a-phc-string");
        assert!(matches!(result, Err(PinError::InvalidHash)));
    }
}
