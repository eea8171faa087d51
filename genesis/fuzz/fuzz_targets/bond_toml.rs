//! Fuzz target for the bond.toml block
//!
//! Tests invariants:
//! - render then parse recovers source, validator, amount and every signature pair
//! - the parser rejects arbitrary text without panicking
//!
//! Run with: cargo test --release -p genesis-bond-fuzz bond_toml

use crate::*;
use genesis_bond_core::parse_bond_toml;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn fuzz_bond_toml_round_trip(bonds in prop::collection::vec(arb_signed_bond(), 0..5)) {
        let result = check_bond_toml_round_trip(&bonds);
        prop_assert!(result.is_valid(), "Invariant violation: {:?}\nBonds: {:?}", result, bonds);
    }

    #[test]
    fn fuzz_bond_toml_parser_never_panics(text in "[\\[\\]a-z0-9=\". \n#]{0,200}") {
        let _ = parse_bond_toml(&text);
    }
}

#[test]
fn empty_block_has_no_bonds() {
    assert!(check_bond_toml_round_trip(&[]).is_valid());
    assert_eq!(parse_bond_toml("").unwrap(), vec![]);
}
