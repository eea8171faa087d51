use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::Amount;

pub const ADDRESS_PREFIX_LEN: usize = 8;
pub const ADDRESS_SUFFIX_LEN: usize = 8;
pub const ADDRESS_DELIMITER: &str = "...";

/// Signing account exposed by the wallet adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub address: String,
    #[serde(default)]
    pub public_key: Option<String>,
    pub alias: String,
    #[serde(default)]
    pub is_shielded: bool,
}

impl Account {
    /// Label shown in the account selector: `alias - tnam1qxyz...abcdefgh`.
    pub fn select_label(&self) -> String {
        format!("{} - {}", self.alias, shorten_address(&self.address))
    }

    pub fn public_key_or_empty(&self) -> &str {
        self.public_key.as_deref().unwrap_or_default()
    }
}

/// Bond arguments handed to the SDK's bond builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondProps {
    pub source: String,
    pub validator: String,
    pub amount: Amount,
}

/// Bond previously accepted by the genesis API for a public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousBond {
    pub source: String,
    pub validator: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct GenesisSignature {
    pub pub_key: String,
    pub signature: String,
}

/// Response of the SDK's detached-signature extraction, borsh encoded on
/// the wire between SDK and client.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct GetTxSignatureResponse {
    pub signatures: Vec<GenesisSignature>,
}

/// Signed genesis bond ready for manual or automatic submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedBond {
    /// Public key of the bonding account.
    pub source: String,
    pub validator: String,
    pub amount: Amount,
    pub signatures: Vec<GenesisSignature>,
}

impl SignedBond {
    pub fn from_props(props: &BondProps, public_key: &str, signatures: Vec<GenesisSignature>) -> Self {
        Self {
            source: public_key.to_string(),
            validator: props.validator.clone(),
            amount: props.amount,
            signatures,
        }
    }
}

/// Shortens a bech32m address for display, keeping both ends.
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= ADDRESS_PREFIX_LEN + ADDRESS_SUFFIX_LEN {
        return address.to_string();
    }
    let prefix: String = chars[..ADDRESS_PREFIX_LEN].iter().collect();
    let suffix: String = chars[chars.len() - ADDRESS_SUFFIX_LEN..].iter().collect();
    format!("{prefix}{ADDRESS_DELIMITER}{suffix}")
}
