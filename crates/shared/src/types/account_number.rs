//! Account number type.
//!
//! Account numbers are ten-digit strings assigned at wallet creation and
//! immutable afterwards. Generation lives in the database layer; this type
//! only guarantees the format.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of a wallet account number.
pub const ACCOUNT_NUMBER_LEN: usize = 10;

/// A validated wallet account number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountNumber(String);

/// Error returned for malformed account numbers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("account number must be exactly {ACCOUNT_NUMBER_LEN} digits")]
pub struct InvalidAccountNumber;

impl AccountNumber {
    /// Parses an account number, enforcing the ten-digit format.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAccountNumber` if the input is not exactly ten ASCII
    /// digits.
    pub fn parse(raw: &str) -> Result<Self, InvalidAccountNumber> {
        if raw.len() == ACCOUNT_NUMBER_LEN && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidAccountNumber)
        }
    }

    /// Returns the account number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountNumber {
    type Err = InvalidAccountNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccountNumber {
    type Error = InvalidAccountNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccountNumber> for String {
    fn from(value: AccountNumber) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_account_number() {
        let num = AccountNumber::parse("1234567890").unwrap();
        assert_eq!(num.as_str(), "1234567890");
        assert_eq!(num.to_string(), "1234567890");
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert_eq!(AccountNumber::parse("123"), Err(InvalidAccountNumber));
        assert_eq!(
            AccountNumber::parse("12345678901"),
            Err(InvalidAccountNumber)
        );
        assert_eq!(AccountNumber::parse(""), Err(InvalidAccountNumber));
    }

    #[test]
    fn test_non_digits_rejected() {
        assert_eq!(AccountNumber::parse("12345abcde"), Err(InvalidAccountNumber));
        assert_eq!(AccountNumber::parse("  34567890"), Err(InvalidAccountNumber));
    }
}
