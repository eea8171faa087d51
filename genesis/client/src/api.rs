//! HTTP client for the genesis bond API and its static JSON mirror.

use std::collections::HashMap;

use async_trait::async_trait;
use genesis_bond_core::{Amount, PreviousBond, SignedBond, ValidatorRecord};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    config::{DataSourceMode, GenesisConfig},
    dispatch::BondSubmitter,
    error::{BondError, Result},
};

pub const VALIDATORS_FILE: &str = "validators_data.json";
pub const BALANCES_FILE: &str = "balances.json";
pub const BONDS_FILE: &str = "combined_bond_data.json";

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Your bond transaction has been successfully submitted \
to be included in the genesis. You will see it reflected in the GitHub repository automatically shortly.";

// ============================================================================
// REQUEST/RESPONSE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    balance: Amount,
}

#[derive(Debug, Deserialize)]
struct BondsResponse {
    bonds: Vec<PreviousBond>,
}

#[derive(Debug, Serialize)]
struct SubmitBondRequest<'a> {
    bonds: &'a [SignedBond],
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    errors: Option<Vec<ApiErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEntry {
    msg: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceStatus {
    Found(Amount),
    NotFound,
}

// ============================================================================
// CLIENT
// ============================================================================

#[derive(Clone)]
pub struct GenesisApiClient {
    base_url: String,
    static_base_url: String,
    data_source: DataSourceMode,
    client: Client,
}

impl GenesisApiClient {
    /// Requests carry no timeout; a stalled endpoint stalls the caller.
    pub fn new(config: &GenesisConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: &GenesisConfig, client: Client) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            static_base_url: config.static_base_url.trim_end_matches('/').to_string(),
            data_source: config.data_source,
            client,
        }
    }

    pub fn data_source(&self) -> DataSourceMode {
        self.data_source
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn static_url(&self, file: &str) -> String {
        format!("{}/{}", self.static_base_url, file)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BondError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.json().await?)
    }

    pub async fn fetch_validators(&self) -> Result<Vec<ValidatorRecord>> {
        let url = match self.data_source {
            DataSourceMode::Api => self.api_url("validators"),
            DataSourceMode::StaticMirror => self.static_url(VALIDATORS_FILE),
        };
        let records: Vec<ValidatorRecord> = self.get_json(&url).await?;
        debug!(count = records.len(), %url, "fetched validators");
        Ok(records)
    }

    /// Genesis balance for `address`. A 404 (or a missing mirror entry) is
    /// reported as [`BalanceStatus::NotFound`], not as an error.
    pub async fn fetch_balance(&self, address: &str) -> Result<BalanceStatus> {
        match self.data_source {
            DataSourceMode::Api => {
                let url = self.api_url(&format!("balance/{address}"));
                let response = self.client.get(&url).send().await?;
                let status = response.status();
                if status == StatusCode::NOT_FOUND {
                    return Ok(BalanceStatus::NotFound);
                }
                if !status.is_success() {
                    return Err(BondError::Http {
                        status: status.as_u16(),
                        url,
                    });
                }
                let body: BalanceResponse = response.json().await?;
                Ok(BalanceStatus::Found(body.balance))
            }
            DataSourceMode::StaticMirror => {
                let balances: HashMap<String, Amount> =
                    self.get_json(&self.static_url(BALANCES_FILE)).await?;
                Ok(balances
                    .get(address)
                    .copied()
                    .map_or(BalanceStatus::NotFound, BalanceStatus::Found))
            }
        }
    }

    /// Bonds already submitted for `public_key`. A non-2xx answer means
    /// "nothing submitted yet".
    pub async fn fetch_previous_bonds(&self, public_key: &str) -> Result<Vec<PreviousBond>> {
        match self.data_source {
            DataSourceMode::Api => {
                let url = self.api_url(&format!("bonds/{public_key}"));
                let response = self.client.get(&url).send().await?;
                if !response.status().is_success() {
                    debug!(status = %response.status(), "no previous bonds");
                    return Ok(Vec::new());
                }
                let body: BondsResponse = response.json().await?;
                Ok(body.bonds)
            }
            DataSourceMode::StaticMirror => {
                let mut combined: HashMap<String, Vec<PreviousBond>> =
                    self.get_json(&self.static_url(BONDS_FILE)).await?;
                Ok(combined.remove(public_key).unwrap_or_default())
            }
        }
    }

    pub async fn submit_bonds(&self, bonds: &[SignedBond]) -> Result<String> {
        let url = self.api_url("submit_bond");
        let response = self
            .client
            .post(&url)
            .json(&SubmitBondRequest { bonds })
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            info!(bonds = bonds.len(), "bonds submitted to genesis API");
            return Ok(SUBMIT_SUCCESS_MESSAGE.to_string());
        }

        let body = response.text().await.unwrap_or_default();
        let message = submission_error_message(status, &body);
        warn!(status = status.as_u16(), error = %message, "bond submission rejected");
        Err(BondError::Submission(message))
    }
}

#[async_trait]
impl BondSubmitter for GenesisApiClient {
    async fn submit(&self, bonds: &[SignedBond], _contact: Option<&str>) -> Result<String> {
        self.submit_bonds(bonds).await
    }
}

/// Joins the server-reported validation errors, or falls back to a generic
/// message when the body has no `errors` list.
pub fn submission_error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody {
            errors: Some(errors),
        }) => errors
            .into_iter()
            .map(|entry| entry.msg)
            .collect::<Vec<_>>()
            .join(", "),
        _ => format!(
            "Unable to submit bond transaction to API {}",
            status.as_u16()
        ),
    }
}
