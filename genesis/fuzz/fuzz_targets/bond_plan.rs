//! Fuzz target for the whole bond plan
//!
//! Tests invariants:
//! - planned bonds never exceed the account balance
//! - no tip bond is produced for a zero tip or when bonding to the tip validator
//! - the rendered bond.toml parses back to the planned bonds
//!
//! Run with: cargo test --release -p genesis-bond-fuzz bond_plan

use crate::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn fuzz_bond_plan(input in any::<BondPlanInput>()) {
        let result = simulate_bond_plan(&input);
        prop_assert!(!result.is_invariant_violation(),
            "Invariant violation: {:?}\nInput: {:?}", result, input);

        if let ScenarioResult::Planned { bonds } = &result {
            prop_assert!(!bonds.is_empty() && bonds.len() <= 2);
            prop_assert_eq!(&bonds[0].validator, &input.validator);
            for bond in bonds {
                prop_assert_eq!(&bond.source, &input.public_key);
                prop_assert!(!bond.amount.is_zero());
            }
        }
    }

    #[test]
    fn fuzz_tip_validator_gets_no_tip(mut input in any::<BondPlanInput>()) {
        input.validator = input.tip_validator.clone();
        input.tip = true;
        if let ScenarioResult::Planned { bonds } = simulate_bond_plan(&input) {
            prop_assert_eq!(bonds.len(), 1);
        }
    }
}

#[test]
fn bond_plan_rejections() {
    let input = BondPlanInput {
        source: "tnam1source".into(),
        public_key: "tpknam1key".into(),
        validator: "tnam1validator".into(),
        tip_validator: "tnam1tip".into(),
        amount_input: "100".into(),
        balance: 50 * UNIT,
        tip: true,
    };
    assert_eq!(
        simulate_bond_plan(&input),
        ScenarioResult::Rejected(Rejection::InsufficientBalance)
    );

    let empty_validator = BondPlanInput {
        validator: String::new(),
        ..input.clone()
    };
    assert_eq!(
        simulate_bond_plan(&empty_validator),
        ScenarioResult::Rejected(Rejection::MissingValidator)
    );

    let zero = BondPlanInput {
        amount_input: "0.000".into(),
        ..input.clone()
    };
    assert_eq!(simulate_bond_plan(&zero), ScenarioResult::Rejected(Rejection::ZeroAmount));

    let funded = BondPlanInput {
        balance: 100 * UNIT,
        ..input
    };
    match simulate_bond_plan(&funded) {
        ScenarioResult::Planned { bonds } => {
            assert_eq!(bonds.len(), 2);
            assert_eq!(bonds[0].amount.base_units(), 80 * UNIT);
            assert_eq!(bonds[1].amount.base_units(), 20 * UNIT);
            assert_eq!(bonds[1].validator, "tnam1tip");
        }
        other => panic!("expected a plan, got {other:?}"),
    }
}
