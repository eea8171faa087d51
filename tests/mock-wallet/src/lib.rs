//! Mock wallet extension and SDK for integration tests.
//!
//! Every double records the calls it receives so tests can assert on what
//! the workflow did, not only on its outcome.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use borsh::BorshSerialize;
use genesis_bond_client::{
    BondError, BondSdk, BondSubmitter, SdkError, Signer, SignedTx, TxProps, WalletAdapter,
    WalletError, WrapperTxProps,
};
use genesis_bond_core::{Account, BondProps, GenesisSignature, GetTxSignatureResponse, SignedBond};

/// What the mock signer hands back.
#[derive(Debug, Clone)]
pub enum SignOutcome {
    /// One signed payload per transaction.
    Signed,
    /// `Ok(None)`: the extension produced no result.
    NoResult,
    /// `Ok(Some(vec![]))`.
    Empty,
    /// Signs only the first transaction of the batch.
    FirstOnly,
    Rejected(String),
}

#[derive(Debug, Clone)]
pub struct SignCall {
    pub tx_count: usize,
    pub signer_address: String,
    pub checksums: BTreeMap<String, String>,
}

pub struct MockSigner {
    outcome: SignOutcome,
    calls: Mutex<Vec<SignCall>>,
}

impl MockSigner {
    pub fn new(outcome: SignOutcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<SignCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Signer for MockSigner {
    async fn sign(
        &self,
        txs: &[TxProps],
        signer_address: &str,
        checksums: &BTreeMap<String, String>,
    ) -> Result<Option<Vec<SignedTx>>, WalletError> {
        self.calls.lock().unwrap().push(SignCall {
            tx_count: txs.len(),
            signer_address: signer_address.to_string(),
            checksums: checksums.clone(),
        });
        match &self.outcome {
            SignOutcome::Signed => Ok(Some(
                txs.iter().map(|tx| format!("signed:{}", tx.hash).into_bytes()).collect(),
            )),
            SignOutcome::NoResult => Ok(None),
            SignOutcome::Empty => Ok(Some(Vec::new())),
            SignOutcome::FirstOnly => Ok(Some(
                txs.iter()
                    .take(1)
                    .map(|tx| format!("signed:{}", tx.hash).into_bytes())
                    .collect(),
            )),
            SignOutcome::Rejected(message) => Err(WalletError(message.clone())),
        }
    }
}

pub struct MockWallet {
    pub installed: bool,
    pub accounts: Vec<Account>,
    signer: Option<Arc<MockSigner>>,
}

impl MockWallet {
    pub fn new(accounts: Vec<Account>, signer: Option<Arc<MockSigner>>) -> Self {
        Self {
            installed: true,
            accounts,
            signer,
        }
    }

    pub fn with_outcome(accounts: Vec<Account>, outcome: SignOutcome) -> (Self, Arc<MockSigner>) {
        let signer = Arc::new(MockSigner::new(outcome));
        (Self::new(accounts, Some(signer.clone())), signer)
    }
}

#[async_trait]
impl WalletAdapter for MockWallet {
    fn detect(&self) -> bool {
        self.installed
    }

    async fn connect(&self) -> Result<(), WalletError> {
        if self.installed {
            Ok(())
        } else {
            Err(WalletError("extension not installed".into()))
        }
    }

    async fn accounts(&self) -> Result<Vec<Account>, WalletError> {
        Ok(self.accounts.clone())
    }

    fn signer(&self) -> Option<Arc<dyn Signer>> {
        self.signer.clone().map(|signer| signer as Arc<dyn Signer>)
    }
}

/// SDK double. Builds succeed unless `build_error` is set; signatures are
/// derived from the signed bytes so tests can tell bonds apart.
#[derive(Default)]
pub struct MockSdk {
    pub build_error: Option<String>,
    built: Mutex<Vec<(WrapperTxProps, BondProps)>>,
}

impl MockSdk {
    pub fn failing(message: &str) -> Self {
        Self {
            build_error: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn built(&self) -> Vec<(WrapperTxProps, BondProps)> {
        self.built.lock().unwrap().clone()
    }
}

#[async_trait]
impl BondSdk for MockSdk {
    async fn build_bond(
        &self,
        wrapper: &WrapperTxProps,
        bond: &BondProps,
    ) -> Result<TxProps, SdkError> {
        if let Some(message) = &self.build_error {
            return Err(SdkError(message.clone()));
        }
        let mut built = self.built.lock().unwrap();
        built.push((wrapper.clone(), bond.clone()));
        Ok(TxProps {
            args: wrapper.clone(),
            hash: format!("tx{}", built.len()),
            bytes: bond.validator.as_bytes().to_vec(),
        })
    }

    async fn get_tx_signature(
        &self,
        signed_tx: &[u8],
        public_key: &str,
    ) -> Result<Vec<u8>, SdkError> {
        let response = GetTxSignatureResponse {
            signatures: vec![GenesisSignature {
                pub_key: public_key.to_string(),
                signature: format!("sig-{}", String::from_utf8_lossy(signed_tx)),
            }],
        };
        response
            .try_to_vec()
            .map_err(|err| SdkError(err.to_string()))
    }
}

/// Submission double: records every batch and answers with a fixed result.
pub struct RecordingSubmitter {
    response: Result<String, String>,
    submissions: Mutex<Vec<(Vec<SignedBond>, Option<String>)>>,
}

impl RecordingSubmitter {
    pub fn accepting(confirmation: &str) -> Self {
        Self {
            response: Ok(confirmation.to_string()),
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn submissions(&self) -> Vec<(Vec<SignedBond>, Option<String>)> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl BondSubmitter for RecordingSubmitter {
    async fn submit(
        &self,
        bonds: &[SignedBond],
        contact: Option<&str>,
    ) -> genesis_bond_client::Result<String> {
        self.submissions
            .lock()
            .unwrap()
            .push((bonds.to_vec(), contact.map(str::to_string)));
        self.response.clone().map_err(BondError::Submission)
    }
}

pub fn transparent_account(address: &str, public_key: &str) -> Account {
    Account {
        address: address.to_string(),
        public_key: Some(public_key.to_string()),
        alias: "main".to_string(),
        is_shielded: false,
    }
}
