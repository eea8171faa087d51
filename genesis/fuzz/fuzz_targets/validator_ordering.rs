//! Fuzz target for validator directory ordering
//!
//! Tests invariants:
//! - ordering is a permutation of the fetched directory
//! - a pinned validator present in the directory is always first
//! - "as listed" keeps the fetched order; "by voting power" is descending
//!
//! Run with: cargo test --release -p genesis-bond-fuzz validator_ordering

use crate::*;
use genesis_bond_core::{order_validators, ValidatorOrdering};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn fuzz_validator_ordering(input in any::<OrderingInput>()) {
        let result = simulate_validator_ordering(&input);
        prop_assert!(!result.is_invariant_violation(),
            "Invariant violation: {:?}\nInput: {:?}", result, input);
    }

    /// A pin that is not in the directory changes nothing.
    #[test]
    fn fuzz_unknown_pin_is_ignored(
        validators in prop::collection::vec(arb_validator(), 0..20),
        seed in any::<u64>(),
    ) {
        let mut ordered = validators.clone();
        order_validators(
            &mut ordered,
            ValidatorOrdering::AsListed,
            Some("tnam1notinthedirectory"),
            &mut StdRng::seed_from_u64(seed),
        );
        prop_assert_eq!(ordered, validators);
    }
}
