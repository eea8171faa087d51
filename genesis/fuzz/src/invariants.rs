//! Workflow invariant checking for fuzz testing

use genesis_bond_core::{
    parse_bond_toml, render_bond_toml, Amount, BondProps, BondSplit, SignedBond, ValidatorInfo,
    ValidatorOrdering,
};

use crate::arbitrary::UNIT;

/// Amount split invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitInvariantResult {
    Valid,
    NotConserved { primary: u128, tip: u128, total: u128 },
    PrimaryNotRoundedUp { expected: u128, actual: u128 },
    PrimaryExceedsAmount { primary: u128, amount: u128 },
    TipWithoutOptIn { tip: u128 },
}

/// Bond intent invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentInvariantResult {
    Valid,
    WrongIntentCount { expected: usize, actual: usize },
    ZeroTipIntent,
    WrongValidator { index: usize },
    IntentTotalMismatch { expected: u128, actual: u128 },
}

/// bond.toml round-trip results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TomlInvariantResult {
    Valid,
    ParseFailed { message: String },
    CountMismatch { expected: usize, actual: usize },
    BondMismatch { index: usize },
}

/// Validator ordering invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderingInvariantResult {
    Valid,
    NotAPermutation,
    PinnedNotFirst,
    AsListedReordered,
    NotSortedByPower { index: usize },
}

macro_rules! impl_is_valid {
    ($($ty:ty),*) => {
        $(impl $ty {
            pub fn is_valid(&self) -> bool {
                *self == Self::Valid
            }
        })*
    };
}

impl_is_valid!(
    SplitInvariantResult,
    IntentInvariantResult,
    TomlInvariantResult,
    OrderingInvariantResult
);

// ============================================================================
// Split Invariants
// ============================================================================

/// Reference primary share: 80% rounded up to a whole token, capped at the
/// amount. `None` when `4 * amount` does not fit in a u128.
pub fn reference_primary(amount: u128) -> Option<u128> {
    let scaled = amount.checked_mul(4)?;
    let whole_tokens = scaled.div_ceil(5 * UNIT);
    Some(whole_tokens.checked_mul(UNIT).map_or(amount, |raw| raw.min(amount)))
}

/// Checks a split of `amount` against conservation and rounding.
pub fn check_split(amount: Amount, with_tip: bool, split: BondSplit) -> SplitInvariantResult {
    let total = amount.base_units();
    let primary = split.primary.base_units();
    let tip = split.tip.base_units();

    if primary.checked_add(tip) != Some(total) {
        return SplitInvariantResult::NotConserved { primary, tip, total };
    }
    if primary > total {
        return SplitInvariantResult::PrimaryExceedsAmount {
            primary,
            amount: total,
        };
    }
    if !with_tip {
        if tip != 0 {
            return SplitInvariantResult::TipWithoutOptIn { tip };
        }
        return SplitInvariantResult::Valid;
    }
    match reference_primary(total) {
        Some(expected) if expected != primary => SplitInvariantResult::PrimaryNotRoundedUp {
            expected,
            actual: primary,
        },
        _ => SplitInvariantResult::Valid,
    }
}

// ============================================================================
// Intent Invariants
// ============================================================================

pub fn check_bond_intents(
    split: BondSplit,
    validator: &str,
    tip_validator: &str,
    intents: &[BondProps],
) -> IntentInvariantResult {
    let expected = if split.has_tip() { 2 } else { 1 };
    if intents.len() != expected {
        return IntentInvariantResult::WrongIntentCount {
            expected,
            actual: intents.len(),
        };
    }
    if intents[0].validator != validator {
        return IntentInvariantResult::WrongValidator { index: 0 };
    }
    if let Some(tip) = intents.get(1) {
        if tip.amount.is_zero() {
            return IntentInvariantResult::ZeroTipIntent;
        }
        if tip.validator != tip_validator {
            return IntentInvariantResult::WrongValidator { index: 1 };
        }
    }
    let actual: u128 = intents.iter().map(|i| i.amount.base_units()).sum();
    let expected = split.total().base_units();
    if actual != expected {
        return IntentInvariantResult::IntentTotalMismatch { expected, actual };
    }
    IntentInvariantResult::Valid
}

// ============================================================================
// bond.toml Invariants
// ============================================================================

/// Rendering then parsing must recover every field and signature pair.
pub fn check_bond_toml_round_trip(bonds: &[SignedBond]) -> TomlInvariantResult {
    let parsed = match parse_bond_toml(&render_bond_toml(bonds)) {
        Ok(parsed) => parsed,
        Err(err) => {
            return TomlInvariantResult::ParseFailed {
                message: err.to_string(),
            }
        }
    };
    if parsed.len() != bonds.len() {
        return TomlInvariantResult::CountMismatch {
            expected: bonds.len(),
            actual: parsed.len(),
        };
    }
    match bonds.iter().zip(&parsed).position(|(a, b)| a != b) {
        Some(index) => TomlInvariantResult::BondMismatch { index },
        None => TomlInvariantResult::Valid,
    }
}

// ============================================================================
// Ordering Invariants
// ============================================================================

pub fn check_validator_ordering(
    before: &[ValidatorInfo],
    after: &[ValidatorInfo],
    ordering: ValidatorOrdering,
    pinned: Option<&str>,
) -> OrderingInvariantResult {
    let mut expected: Vec<&str> = before.iter().map(|v| v.address.as_str()).collect();
    let mut actual: Vec<&str> = after.iter().map(|v| v.address.as_str()).collect();
    expected.sort_unstable();
    actual.sort_unstable();
    if expected != actual {
        return OrderingInvariantResult::NotAPermutation;
    }

    let pinned_present = pinned.filter(|p| before.iter().any(|v| v.address == *p));
    if let Some(pinned) = pinned_present {
        if after.first().map(|v| v.address.as_str()) != Some(pinned) {
            return OrderingInvariantResult::PinnedNotFirst;
        }
    }

    // Everything after the pinned entry keeps the mode's order.
    let rest = if pinned_present.is_some() { &after[1..] } else { after };
    match ordering {
        ValidatorOrdering::AsListed => {
            let listed: Vec<&str> = before
                .iter()
                .map(|v| v.address.as_str())
                .filter(|a| Some(*a) != pinned_present)
                .collect();
            let shown: Vec<&str> = rest.iter().map(|v| v.address.as_str()).collect();
            if listed != shown {
                return OrderingInvariantResult::AsListedReordered;
            }
        }
        ValidatorOrdering::ByVotingPower => {
            if let Some(index) = rest
                .windows(2)
                .position(|w| w[0].total_voting_power < w[1].total_voting_power)
            {
                return OrderingInvariantResult::NotSortedByPower { index };
            }
        }
        ValidatorOrdering::Shuffled => {}
    }
    OrderingInvariantResult::Valid
}
