//! Property tests for the scoring policy.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::policy::{LoanPolicy, ScoreInputs};

fn balance_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Scores are always within [0, 100].
    #[test]
    fn prop_score_bounded(
        verified in any::<bool>(),
        balance in balance_strategy(),
        entries in 0u64..1000,
    ) {
        let policy = LoanPolicy::default();
        let score = policy.score(&ScoreInputs {
            identity_verified: verified,
            balance,
            completed_entries: entries,
        });
        prop_assert!(score <= 100);
    }

    /// More balance never lowers the score.
    #[test]
    fn prop_score_monotonic_in_balance(
        verified in any::<bool>(),
        balance in balance_strategy(),
        extra in balance_strategy(),
        entries in 0u64..1000,
    ) {
        let policy = LoanPolicy::default();
        let low = policy.score(&ScoreInputs {
            identity_verified: verified,
            balance,
            completed_entries: entries,
        });
        let high = policy.score(&ScoreInputs {
            identity_verified: verified,
            balance: balance + extra,
            completed_entries: entries,
        });
        prop_assert!(high >= low);
    }

    /// More history never lowers the score.
    #[test]
    fn prop_score_monotonic_in_entries(
        verified in any::<bool>(),
        balance in balance_strategy(),
        entries in 0u64..1000,
        extra in 0u64..1000,
    ) {
        let policy = LoanPolicy::default();
        let low = policy.score(&ScoreInputs {
            identity_verified: verified,
            balance,
            completed_entries: entries,
        });
        let high = policy.score(&ScoreInputs {
            identity_verified: verified,
            balance,
            completed_entries: entries + extra,
        });
        prop_assert!(high >= low);
    }

    /// Verification never lowers the score.
    #[test]
    fn prop_score_monotonic_in_verification(
        balance in balance_strategy(),
        entries in 0u64..1000,
    ) {
        let policy = LoanPolicy::default();
        let unverified = policy.score(&ScoreInputs {
            identity_verified: false,
            balance,
            completed_entries: entries,
        });
        let verified = policy.score(&ScoreInputs {
            identity_verified: true,
            balance,
            completed_entries: entries,
        });
        prop_assert!(verified >= unverified);
        prop_assert_eq!(unverified, 0);
    }
}
