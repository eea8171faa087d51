//! Fuzz target for amount parsing and the tip split
//!
//! Tests invariants:
//! - primary + tip == amount, always
//! - with a tip, primary is 80% rounded up to a whole token (capped at the amount)
//! - without a tip, the whole amount goes to the chosen validator
//!
//! Run with: cargo test --release -p genesis-bond-fuzz amount_split

use crate::*;
use genesis_bond_core::{Amount, AmountError, MAX_INPUT_DECIMALS};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn fuzz_split(input in any::<SplitInput>()) {
        let amount = Amount::from_base_units(input.base_units);
        let split = amount.split(input.with_tip);
        let result = check_split(amount, input.with_tip, split);
        prop_assert!(result.is_valid(), "Invariant violation: {:?}\nInput: {:?}", result, input);

        if !input.with_tip {
            prop_assert_eq!(split.primary, amount);
            prop_assert!(!split.has_tip());
        }
    }

    /// Whole-token amounts below u64::MAX split exactly like ceil(0.8 * A).
    #[test]
    fn fuzz_split_whole_tokens(tokens in 1u64..u64::MAX) {
        let split = Amount::from_whole(tokens).split(true);
        let expected = (u128::from(tokens) * 4).div_ceil(5);
        prop_assert_eq!(split.primary.base_units(), expected * UNIT);
        prop_assert_eq!(split.total(), Amount::from_whole(tokens));
    }

    /// Parsing never panics; accepted input has at most three decimals and
    /// prints back to the same value.
    #[test]
    fn fuzz_parse_amount_input(text in arb_amount_input()) {
        match Amount::parse_input(&text) {
            Ok(amount) => {
                let fraction = text.trim().split_once('.').map_or("", |(_, f)| f);
                prop_assert!(fraction.len() <= MAX_INPUT_DECIMALS as usize);
                let reparsed: Amount = amount.to_string().parse().unwrap();
                prop_assert_eq!(reparsed, amount);
            }
            Err(AmountError::TooManyDecimals { max, actual }) => {
                prop_assert_eq!(max, MAX_INPUT_DECIMALS);
                prop_assert!(actual > max as usize);
            }
            Err(_) => {}
        }
    }
}

#[test]
fn split_edge_cases() {
    for (raw, primary, tip) in [
        (100 * UNIT, 80 * UNIT, 20 * UNIT),
        (7 * UNIT, 6 * UNIT, UNIT),
        (UNIT, UNIT, 0),
        (UNIT / 2, UNIT / 2, 0),
        (1, 1, 0),
    ] {
        let split = Amount::from_base_units(raw).split(true);
        assert_eq!(split.primary.base_units(), primary, "primary of {raw}");
        assert_eq!(split.tip.base_units(), tip, "tip of {raw}");
    }

    let max = Amount::from_base_units(u128::MAX);
    let split = max.split(true);
    assert!(check_split(max, true, split).is_valid());
}
