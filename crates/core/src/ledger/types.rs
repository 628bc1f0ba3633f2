//! Ledger domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Funds credited into a wallet from outside the ledger.
    TopUp,
    /// Funds debited out of a wallet to the outside.
    Withdraw,
    /// Funds moved between two wallets.
    Transfer,
}

/// Status of a ledger entry.
///
/// Entries are written `completed`; only entries awaiting an external
/// payment confirmation start `pending` and transition exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Awaiting external confirmation.
    Pending,
    /// Applied to the wallet balance.
    Completed,
    /// Confirmed failed; no balance effect.
    Failed,
}

impl EntryStatus {
    /// Returns true if the status can no longer change.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// The state of a wallet row read under an exclusive lock.
///
/// Only the fields the mutation rules need; the balance mutator builds this
/// from the locked database row.
#[derive(Debug, Clone)]
pub struct WalletSnapshot {
    /// The wallet ID.
    pub id: Uuid,
    /// Current balance.
    pub balance: Decimal,
    /// Whether the wallet is active.
    pub is_active: bool,
    /// Whether the wallet is frozen.
    pub is_frozen: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_status_terminal() {
        assert!(!EntryStatus::Pending.is_terminal());
        assert!(EntryStatus::Completed.is_terminal());
        assert!(EntryStatus::Failed.is_terminal());
    }

    #[test]
    fn test_entry_kind_serde() {
        assert_eq!(
            serde_json::to_string(&EntryKind::TopUp).unwrap(),
            "\"top_up\""
        );
        assert_eq!(
            serde_json::from_str::<EntryKind>("\"withdraw\"").unwrap(),
            EntryKind::Withdraw
        );
    }
}
