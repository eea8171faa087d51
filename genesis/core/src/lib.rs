#![forbid(unsafe_code)]

pub mod amount;
pub mod bond_toml;
pub mod types;
pub mod validators;

pub use amount::{Amount, AmountError, BondSplit, MAX_INPUT_DECIMALS, NATIVE_DECIMALS};
pub use bond_toml::{parse_bond_toml, render_bond_toml, BondTomlError};
pub use types::{
    shorten_address, Account, BondProps, GenesisSignature, GetTxSignatureResponse, PreviousBond,
    SignedBond,
};
pub use validators::{
    order_validators, select_options, SelectOption, ValidatorInfo, ValidatorOrdering,
    ValidatorRecord,
};

/// Builds the primary bond and, when the split carries a tip, the tip bond.
///
/// The tip bond is never produced for a zero tip.
pub fn bond_intents(
    source: &str,
    validator: &str,
    tip_validator: &str,
    split: BondSplit,
) -> Vec<BondProps> {
    let mut intents = vec![BondProps {
        source: source.to_string(),
        validator: validator.to_string(),
        amount: split.primary,
    }];
    if split.has_tip() {
        intents.push(BondProps {
            source: source.to_string(),
            validator: tip_validator.to_string(),
            amount: split.tip,
        });
    }
    intents
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intents_without_tip_have_single_bond() {
        let split = Amount::from_whole(100).split(false);
        let intents = bond_intents("tnam1src", "tnam1val", "tnam1tip", split);
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].amount, Amount::from_whole(100));
        assert_eq!(intents[0].validator, "tnam1val");
    }

    #[test]
    fn intents_with_tip_target_tip_validator() {
        let split = Amount::from_whole(100).split(true);
        let intents = bond_intents("tnam1src", "tnam1val", "tnam1tip", split);
        assert_eq!(intents.len(), 2);
        assert_eq!(intents[0].amount, Amount::from_whole(80));
        assert_eq!(intents[1].validator, "tnam1tip");
        assert_eq!(intents[1].amount, Amount::from_whole(20));
        assert!(intents.iter().all(|intent| intent.source == "tnam1src"));
    }

    #[test]
    fn zero_tip_produces_no_tip_intent() {
        let split = "0.5".parse::<Amount>().unwrap().split(true);
        let intents = bond_intents("tnam1src", "tnam1val", "tnam1tip", split);
        assert_eq!(intents.len(), 1);
    }
}
