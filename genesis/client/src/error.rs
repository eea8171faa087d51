use genesis_bond_core::AmountError;
use thiserror::Error;

use crate::config::ConfigError;

pub const CHAIN_ID_MISMATCH: &str = "CHAIN_ID_MISMATCH";
pub const CHAIN_ID_MISMATCH_MARKER: &str = "does not match Tx header chain_id";
pub const CHAIN_ID_MISMATCH_HELP: &str = "Unable to sign transaction. Please make sure to configure \
the correct chain id (namada-genesis) in namada extension.";

pub const NO_SIGNING_RESULT: &str = "No result from signing";
pub const MISSING_VALUES: &str = "Please provide the required values!";
pub const MISSING_VALIDATOR: &str = "Please select a validator!";
pub const INSUFFICIENT_BALANCE: &str = "Insufficient Balance";
pub const NO_GENESIS_BALANCE: &str = "We can't find a genesis balance for this account. \
Please make sure you claimed your airdrop back in the days.";

#[derive(Debug, Error)]
pub enum BondError {
    #[error("request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    Http { status: u16, url: String },

    #[error("no genesis balance for {address}")]
    NoBalanceFound { address: String },

    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("{0}")]
    Build(String),

    #[error("{0}")]
    ChainIdMismatch(String),

    #[error("{0}")]
    WalletRejected(String),

    #[error("No result from signing")]
    Signing,

    #[error("signer returned {actual} results for {expected} transactions")]
    SignatureCount { expected: usize, actual: usize },

    #[error("could not decode signature response: {0}")]
    SignatureDecode(String),

    #[error("{0}")]
    Submission(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = BondError> = std::result::Result<T, E>;

impl BondError {
    /// Build failure reported by the SDK, with the chain id special case.
    pub fn from_sdk_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains(CHAIN_ID_MISMATCH_MARKER) {
            Self::ChainIdMismatch(message)
        } else {
            Self::Build(message)
        }
    }

    /// Rejection reported by the wallet signer, with the chain id special case.
    pub fn from_wallet_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains(CHAIN_ID_MISMATCH_MARKER) {
            Self::ChainIdMismatch(message)
        } else {
            Self::WalletRejected(message)
        }
    }

    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::ChainIdMismatch(_) => Some(CHAIN_ID_MISMATCH),
            _ => None,
        }
    }

    /// The single string shown in the form's error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::ChainIdMismatch(_) => CHAIN_ID_MISMATCH.to_string(),
            Self::InvalidInput(message) => (*message).to_string(),
            Self::InvalidAmount(_) => MISSING_VALUES.to_string(),
            Self::Signing => format!("Error: {NO_SIGNING_RESULT}"),
            Self::NoBalanceFound { .. } => NO_GENESIS_BALANCE.to_string(),
            other => format!("Unable to sign transaction. Error: {other}"),
        }
    }
}
