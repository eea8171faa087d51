use borsh::BorshDeserialize;
use genesis_bond_core::{Account, GetTxSignatureResponse, SignedBond};
use tracing::{debug, error};

use crate::{
    builder::BuiltBonds,
    config::bond_wasm_checksums,
    error::{BondError, Result},
    sdk::BondSdk,
    wallet::WalletAdapter,
};

/// Signs the built bonds with the account's wallet signer and pairs each
/// detached signature set with its intent.
pub async fn sign_bonds(
    wallet: &dyn WalletAdapter,
    sdk: &dyn BondSdk,
    account: &Account,
    built: &BuiltBonds,
) -> Result<Vec<SignedBond>> {
    let Some(signer) = wallet.signer() else {
        error!("wallet exposes no signer");
        return Err(BondError::Signing);
    };

    let checksums = bond_wasm_checksums();
    let signed = signer
        .sign(&built.txs, &account.address, &checksums)
        .await
        .map_err(|err| BondError::from_wallet_message(err.0))?;

    let signed = match signed {
        Some(signed) if !signed.is_empty() => signed,
        _ => {
            error!("no result from signing");
            return Err(BondError::Signing);
        }
    };
    if signed.len() != built.intents.len() {
        error!(expected = built.intents.len(), actual = signed.len(), "signer result count mismatch");
        return Err(BondError::SignatureCount {
            expected: built.intents.len(),
            actual: signed.len(),
        });
    }

    let public_key = account.public_key_or_empty();
    let mut bonds = Vec::with_capacity(signed.len());
    for (intent, signed_tx) in built.intents.iter().zip(&signed) {
        let encoded = sdk
            .get_tx_signature(signed_tx, public_key)
            .await
            .map_err(|err| BondError::from_sdk_message(err.0))?;
        let response = GetTxSignatureResponse::try_from_slice(&encoded)
            .map_err(|err| BondError::SignatureDecode(err.to_string()))?;
        debug!(
            validator = %intent.validator,
            signatures = response.signatures.len(),
            "extracted bond signatures"
        );
        bonds.push(SignedBond::from_props(intent, public_key, response.signatures));
    }
    Ok(bonds)
}
