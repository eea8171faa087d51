//! Arbitrary input generators for fuzz testing
//!
//! Generates random but well-formed inputs for the bond workflow.

use genesis_bond_core::{Amount, GenesisSignature, SignedBond, ValidatorInfo, ValidatorOrdering};
use proptest::prelude::*;

/// Base units per whole token.
pub const UNIT: u128 = 1_000_000;

/// Arbitrary amount in base units with edge cases
/// Tests: 0, sub-token, exact tokens, multiples of 5 tokens, u128::MAX
pub fn arb_base_units() -> impl Strategy<Value = u128> {
    prop_oneof![
        // Edge cases
        Just(0u128),
        Just(1u128),
        Just(UNIT - 1),
        Just(UNIT),
        Just(5 * UNIT),
        Just(u128::MAX),
        Just(u128::MAX - 1),
        // Sub-token amounts
        1u128..UNIT,
        // Typical amounts (1 - 1M tokens)
        UNIT..1_000_000 * UNIT,
        // Large amounts
        1_000_000 * UNIT..u128::MAX / 2,
    ]
}

/// Arbitrary non-zero amount
pub fn arb_amount() -> impl Strategy<Value = Amount> {
    arb_base_units()
        .prop_filter("amount must be non-zero", |raw| *raw > 0)
        .prop_map(Amount::from_base_units)
}

/// Arbitrary text typed into the amount field, valid or not
pub fn arb_amount_input() -> impl Strategy<Value = String> {
    prop_oneof![
        // Well-formed, up to 3 decimals
        "[0-9]{1,12}",
        "[0-9]{1,12}\\.[0-9]{1,3}",
        "\\.[0-9]{1,3}",
        // Too many decimals
        "[0-9]{1,6}\\.[0-9]{4,8}",
        // Garbage
        Just(String::new()),
        Just(".".to_string()),
        Just("-1".to_string()),
        Just("1e6".to_string()),
        "[ -~]{0,16}",
        // Overflow
        "[1-9][0-9]{40,45}",
    ]
}

/// Bech32-ish identifier safe to embed in a bond.toml block
pub fn arb_bech32(prefix: &'static str) -> impl Strategy<Value = String> {
    "[02-9ac-hj-np-z]{20,64}".prop_map(move |body| format!("{prefix}{body}"))
}

pub fn arb_signature() -> impl Strategy<Value = GenesisSignature> {
    (arb_bech32("tpknam1"), arb_bech32("signam1"))
        .prop_map(|(pub_key, signature)| GenesisSignature { pub_key, signature })
}

pub fn arb_signed_bond() -> impl Strategy<Value = SignedBond> {
    (
        arb_bech32("tpknam1"),
        arb_bech32("tnam1"),
        arb_base_units(),
        prop::collection::vec(arb_signature(), 0..4),
    )
        .prop_map(|(source, validator, raw, signatures)| SignedBond {
            source,
            validator,
            amount: Amount::from_base_units(raw),
            signatures,
        })
}

/// Arbitrary validator ordering mode
pub fn arb_ordering() -> impl Strategy<Value = ValidatorOrdering> {
    prop_oneof![
        Just(ValidatorOrdering::AsListed),
        Just(ValidatorOrdering::Shuffled),
        Just(ValidatorOrdering::ByVotingPower),
    ]
}

/// Arbitrary voting power, including ties and zero
pub fn arb_voting_power() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0f64),
        Just(1.0f64),
        Just(1_000_000.0f64),
        0.0f64..1e12f64,
    ]
}

pub fn arb_validator() -> impl Strategy<Value = ValidatorInfo> {
    (arb_bech32("tnam1"), "[a-zA-Z ]{0,12}", arb_voting_power()).prop_map(
        |(address, alias, total_voting_power)| ValidatorInfo {
            address,
            alias,
            commission_rate: 5.0,
            total_bond: total_voting_power,
            total_voting_power,
            email: None,
            website: None,
            discord_handle: None,
        },
    )
}

/// Input for the amount split fuzz target
#[derive(Debug, Clone)]
pub struct SplitInput {
    pub base_units: u128,
    pub with_tip: bool,
}

impl Arbitrary for SplitInput {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (arb_base_units(), any::<bool>())
            .prop_map(|(base_units, with_tip)| SplitInput {
                base_units,
                with_tip,
            })
            .boxed()
    }
}

/// Input for the validator ordering fuzz target
#[derive(Debug, Clone)]
pub struct OrderingInput {
    pub validators: Vec<ValidatorInfo>,
    pub ordering: ValidatorOrdering,
    /// Index into `validators` of the pinned entry; may be out of range.
    pub pinned_index: Option<usize>,
    pub seed: u64,
}

impl Arbitrary for OrderingInput {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            prop::collection::vec(arb_validator(), 0..40),
            arb_ordering(),
            prop::option::of(0usize..48),
            any::<u64>(),
        )
            .prop_map(|(validators, ordering, pinned_index, seed)| OrderingInput {
                validators,
                ordering,
                pinned_index,
                seed,
            })
            .boxed()
    }
}

/// Input for a full bond plan: form values as the user typed them
#[derive(Debug, Clone)]
pub struct BondPlanInput {
    pub source: String,
    pub public_key: String,
    pub validator: String,
    pub tip_validator: String,
    pub amount_input: String,
    pub balance: u128,
    pub tip: bool,
}

impl Arbitrary for BondPlanInput {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            arb_bech32("tnam1"),
            arb_bech32("tpknam1"),
            prop_oneof![Just(String::new()), arb_bech32("tnam1")],
            arb_bech32("tnam1"),
            arb_amount_input(),
            arb_base_units(),
            any::<bool>(),
        )
            .prop_map(
                |(source, public_key, validator, tip_validator, amount_input, balance, tip)| {
                    BondPlanInput {
                        source,
                        public_key,
                        validator,
                        tip_validator,
                        amount_input,
                        balance,
                        tip,
                    }
                },
            )
            .boxed()
    }
}
