//! Fuzz testing scenarios that run the bond workflow end to end
//!
//! These scenarios drive the pure workflow steps (amount parsing, splitting,
//! intent construction, bond.toml rendering) with a stand-in signer, so no
//! wallet extension or SDK is needed.

use genesis_bond_core::{
    bond_intents, order_validators, Amount, AmountError, GenesisSignature, SignedBond,
    ValidatorInfo,
};
use rand::{rngs::StdRng, SeedableRng};

use crate::arbitrary::{BondPlanInput, OrderingInput};
use crate::invariants::*;

/// Why the form refused to build bonds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    InvalidAmount(AmountError),
    ZeroAmount,
    MissingValidator,
    InsufficientBalance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioResult {
    Planned { bonds: Vec<SignedBond> },
    Rejected(Rejection),
    SplitViolation(SplitInvariantResult),
    IntentViolation(IntentInvariantResult),
    TomlViolation(TomlInvariantResult),
    OrderingViolation(OrderingInvariantResult),
    BalanceExceeded { planned: u128, balance: u128 },
}

impl ScenarioResult {
    pub fn is_invariant_violation(&self) -> bool {
        !matches!(
            self,
            ScenarioResult::Planned { .. } | ScenarioResult::Rejected(_)
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ScenarioResult::Planned { .. })
    }
}

/// Stand-in for the wallet: one deterministic signature per bond.
pub fn stand_in_signatures(public_key: &str, validator: &str) -> Vec<GenesisSignature> {
    vec![GenesisSignature {
        pub_key: public_key.to_string(),
        signature: format!("signam1{}", validator.trim_start_matches("tnam1")),
    }]
}

/// Runs the form's checks, the split and the manual-mode rendering, and
/// checks every invariant along the way.
pub fn simulate_bond_plan(input: &BondPlanInput) -> ScenarioResult {
    let amount = match Amount::parse_input(&input.amount_input) {
        Ok(amount) => amount,
        Err(err) => return ScenarioResult::Rejected(Rejection::InvalidAmount(err)),
    };
    if amount.is_zero() {
        return ScenarioResult::Rejected(Rejection::ZeroAmount);
    }
    if input.validator.is_empty() {
        return ScenarioResult::Rejected(Rejection::MissingValidator);
    }
    if amount.base_units() > input.balance {
        return ScenarioResult::Rejected(Rejection::InsufficientBalance);
    }

    let with_tip = input.tip && input.validator != input.tip_validator;
    let split = amount.split(with_tip);
    let check = check_split(amount, with_tip, split);
    if !check.is_valid() {
        return ScenarioResult::SplitViolation(check);
    }

    let intents = bond_intents(&input.source, &input.validator, &input.tip_validator, split);
    let check = check_bond_intents(split, &input.validator, &input.tip_validator, &intents);
    if !check.is_valid() {
        return ScenarioResult::IntentViolation(check);
    }

    let planned: u128 = intents.iter().map(|i| i.amount.base_units()).sum();
    if planned > input.balance {
        return ScenarioResult::BalanceExceeded {
            planned,
            balance: input.balance,
        };
    }

    let bonds: Vec<SignedBond> = intents
        .iter()
        .map(|intent| {
            SignedBond::from_props(
                intent,
                &input.public_key,
                stand_in_signatures(&input.public_key, &intent.validator),
            )
        })
        .collect();
    let check = check_bond_toml_round_trip(&bonds);
    if !check.is_valid() {
        return ScenarioResult::TomlViolation(check);
    }

    ScenarioResult::Planned { bonds }
}

/// Orders a directory the way the loader does and checks the result.
pub fn simulate_validator_ordering(input: &OrderingInput) -> ScenarioResult {
    let pinned = input
        .pinned_index
        .and_then(|index| input.validators.get(index))
        .map(|v| v.address.clone());

    let mut ordered: Vec<ValidatorInfo> = input.validators.clone();
    let mut rng = StdRng::seed_from_u64(input.seed);
    order_validators(&mut ordered, input.ordering, pinned.as_deref(), &mut rng);

    let check =
        check_validator_ordering(&input.validators, &ordered, input.ordering, pinned.as_deref());
    if !check.is_valid() {
        return ScenarioResult::OrderingViolation(check);
    }
    ScenarioResult::Planned { bonds: Vec::new() }
}
