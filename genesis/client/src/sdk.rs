//! Seam to the transaction SDK, which owns bond construction and signature
//! extraction.

use async_trait::async_trait;
use genesis_bond_core::{Amount, BondProps};
use serde::{Deserialize, Serialize};

use crate::config::GenesisConfig;

/// Wrapper arguments shared by every genesis bond transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrapperTxProps {
    pub token: String,
    pub fee_amount: Amount,
    pub gas_limit: Amount,
    pub chain_id: String,
    pub public_key: Option<String>,
    pub memo: String,
}

impl WrapperTxProps {
    /// Genesis bonds carry no fee or gas and an empty memo.
    pub fn genesis(config: &GenesisConfig, public_key: Option<&str>) -> Self {
        Self {
            token: config.native_token.clone(),
            fee_amount: Amount::ZERO,
            gas_limit: Amount::ZERO,
            chain_id: config.chain_id.clone(),
            public_key: public_key.map(str::to_string),
            memo: String::new(),
        }
    }
}

/// Unsigned transaction produced by the SDK; opaque to the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxProps {
    pub args: WrapperTxProps,
    pub hash: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkError(pub String);

impl std::fmt::Display for SdkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for SdkError {}

#[async_trait]
pub trait BondSdk: Send + Sync {
    async fn build_bond(
        &self,
        wrapper: &WrapperTxProps,
        bond: &BondProps,
    ) -> Result<TxProps, SdkError>;

    /// Returns the borsh-encoded `GetTxSignatureResponse` for a signed tx.
    async fn get_tx_signature(
        &self,
        signed_tx: &[u8],
        public_key: &str,
    ) -> Result<Vec<u8>, SdkError>;
}
