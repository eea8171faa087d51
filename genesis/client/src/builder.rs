use genesis_bond_core::{bond_intents, Account, Amount, BondProps};
use tracing::debug;

use crate::{
    config::GenesisConfig,
    error::{BondError, Result, INSUFFICIENT_BALANCE, MISSING_VALIDATOR, MISSING_VALUES},
    sdk::{BondSdk, TxProps, WrapperTxProps},
};

/// Bond request as entered in the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondRequest<'a> {
    pub account: Option<&'a Account>,
    pub validator: &'a str,
    pub amount: Option<Amount>,
    pub balance: Amount,
    pub tip: bool,
}

/// Bonds built for one submission: the intents and their SDK transactions,
/// index-aligned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltBonds {
    pub intents: Vec<BondProps>,
    pub txs: Vec<TxProps>,
}

/// Checks the request and derives the primary and optional tip intents.
pub fn plan_bonds(config: &GenesisConfig, request: &BondRequest<'_>) -> Result<Vec<BondProps>> {
    let (Some(account), Some(amount)) = (request.account, request.amount) else {
        return Err(BondError::InvalidInput(MISSING_VALUES));
    };
    if amount.is_zero() {
        return Err(BondError::InvalidInput(MISSING_VALUES));
    }
    if request.validator.trim().is_empty() {
        return Err(BondError::InvalidInput(MISSING_VALIDATOR));
    }
    if amount > request.balance {
        return Err(BondError::InvalidInput(INSUFFICIENT_BALANCE));
    }

    // Tipping the tip validator itself is not offered.
    let tip = request.tip && request.validator != config.tip_validator_address;
    let split = amount.split(tip);
    Ok(bond_intents(
        &account.address,
        request.validator,
        &config.tip_validator_address,
        split,
    ))
}

pub async fn build_bonds(
    config: &GenesisConfig,
    sdk: &dyn BondSdk,
    account: &Account,
    intents: Vec<BondProps>,
) -> Result<BuiltBonds> {
    let wrapper = WrapperTxProps::genesis(config, account.public_key.as_deref());
    let mut txs = Vec::with_capacity(intents.len());
    for intent in &intents {
        let tx = sdk
            .build_bond(&wrapper, intent)
            .await
            .map_err(|err| BondError::from_sdk_message(err.0))?;
        debug!(validator = %intent.validator, amount = %intent.amount, "built bond tx");
        txs.push(tx);
    }
    Ok(BuiltBonds { intents, txs })
}
