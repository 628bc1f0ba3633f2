//! Loan eligibility scoring policy.
//!
//! Scoring weights are a policy decision, not a structural contract. They
//! live in a [`LoanPolicy`] value built at startup so deployments can tune
//! them without touching the engine.

use rust_decimal::Decimal;

/// Inputs to the eligibility score.
///
/// All three are supplied by the caller; the policy itself performs no I/O.
#[derive(Debug, Clone)]
pub struct ScoreInputs {
    /// Whether the identity layer has verified this owner.
    pub identity_verified: bool,
    /// Current wallet balance.
    pub balance: Decimal,
    /// Number of completed ledger entries in the owner's history.
    pub completed_entries: u64,
}

/// Eligibility scoring policy.
///
/// The score is monotonic in each input and clamped to 100. An unverified
/// identity scores zero outright.
#[derive(Debug, Clone)]
pub struct LoanPolicy {
    /// Points awarded for a verified identity.
    pub verified_weight: u8,
    /// Balance at or above which the balance tier awards points.
    pub balance_threshold: Decimal,
    /// Points awarded for reaching the balance threshold.
    pub balance_weight: u8,
    /// Completed-entry count at or above which history awards points.
    pub entry_threshold: u64,
    /// Points awarded for reaching the entry threshold.
    pub entry_weight: u8,
    /// Minimum score required for loan approval.
    pub approval_threshold: u8,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            verified_weight: 40,
            balance_threshold: Decimal::new(500, 0),
            balance_weight: 30,
            entry_threshold: 3,
            entry_weight: 30,
            approval_threshold: 60,
        }
    }
}

impl LoanPolicy {
    /// Scores an owner's creditworthiness in `[0, 100]`.
    #[must_use]
    pub fn score(&self, inputs: &ScoreInputs) -> u8 {
        if !inputs.identity_verified {
            return 0;
        }

        let mut score = u32::from(self.verified_weight);
        if inputs.balance >= self.balance_threshold {
            score += u32::from(self.balance_weight);
        }
        if inputs.completed_entries >= self.entry_threshold {
            score += u32::from(self.entry_weight);
        }

        u8::try_from(score.min(100)).unwrap_or(100)
    }

    /// Returns true if a score meets the approval threshold.
    #[must_use]
    pub fn is_eligible(&self, score: u8) -> bool {
        score >= self.approval_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn inputs(verified: bool, balance: Decimal, entries: u64) -> ScoreInputs {
        ScoreInputs {
            identity_verified: verified,
            balance,
            completed_entries: entries,
        }
    }

    #[test]
    fn test_unverified_scores_zero() {
        let policy = LoanPolicy::default();
        assert_eq!(policy.score(&inputs(false, dec!(10000), 50)), 0);
    }

    #[test]
    fn test_verified_baseline() {
        let policy = LoanPolicy::default();
        assert_eq!(policy.score(&inputs(true, dec!(0), 0)), 40);
    }

    #[test]
    fn test_balance_tier_adds_points() {
        let policy = LoanPolicy::default();
        assert_eq!(policy.score(&inputs(true, dec!(500), 0)), 70);
        assert_eq!(policy.score(&inputs(true, dec!(499.99), 0)), 40);
    }

    #[test]
    fn test_full_score_clamped_to_100() {
        let policy = LoanPolicy {
            verified_weight: 60,
            balance_weight: 60,
            entry_weight: 60,
            ..LoanPolicy::default()
        };
        assert_eq!(policy.score(&inputs(true, dec!(1000), 10)), 100);
    }

    #[test]
    fn test_default_eligibility_threshold() {
        let policy = LoanPolicy::default();

        // Verified + history but a thin balance: 70, eligible.
        assert!(policy.is_eligible(policy.score(&inputs(true, dec!(0), 3))));
        // Verified only: 40, not eligible.
        assert!(!policy.is_eligible(policy.score(&inputs(true, dec!(0), 0))));
        assert!(policy.is_eligible(60));
        assert!(!policy.is_eligible(59));
    }

    #[test]
    fn test_custom_policy_mid_score() {
        // A policy that lands on 45 exercises the rejection path.
        let policy = LoanPolicy {
            verified_weight: 15,
            balance_weight: 30,
            entry_weight: 30,
            ..LoanPolicy::default()
        };
        let score = policy.score(&inputs(true, dec!(600), 0));
        assert_eq!(score, 45);
        assert!(!policy.is_eligible(score));
    }
}
