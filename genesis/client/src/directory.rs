use genesis_bond_core::{order_validators, ValidatorInfo};
use tracing::{error, info};

use crate::{api::GenesisApiClient, config::GenesisConfig, error::Result};

/// Loads the validator directory and orders it for display. There is no
/// retry; on failure the caller shows no validators.
pub async fn load_validators<R: rand::Rng + ?Sized>(
    api: &GenesisApiClient,
    config: &GenesisConfig,
    rng: &mut R,
) -> Result<Vec<ValidatorInfo>> {
    let records = api.fetch_validators().await.map_err(|err| {
        error!(error = %err, "failed to fetch validators");
        err
    })?;

    let mut validators: Vec<ValidatorInfo> = records.into_iter().map(ValidatorInfo::from).collect();
    order_validators(
        &mut validators,
        config.validator_ordering,
        config.pinned_validator.as_deref(),
        rng,
    );
    info!(count = validators.len(), "validator directory loaded");
    Ok(validators)
}
