//! Balance and bond-status lookup for the selected account.
//!
//! Only a missing balance is surfaced to the user. Every other failure is
//! logged and otherwise ignored, so the form keeps whatever it showed before.

use genesis_bond_core::{Account, Amount, PreviousBond};
use tracing::warn;

use crate::api::{BalanceStatus, GenesisApiClient};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceLookup {
    Found(Amount),
    /// No genesis allocation exists; bonding is disabled for this account.
    NoGenesisAllocation,
    /// The lookup failed for another reason and was logged.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviousBondsLookup {
    Found(Vec<PreviousBond>),
    /// The lookup failed and was logged; keep the previous value.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountStatus {
    pub balance: BalanceLookup,
    pub previous_bonds: PreviousBondsLookup,
}

pub async fn lookup_balance(api: &GenesisApiClient, account: &Account) -> BalanceLookup {
    match api.fetch_balance(&account.address).await {
        Ok(BalanceStatus::Found(balance)) => BalanceLookup::Found(balance),
        Ok(BalanceStatus::NotFound) => BalanceLookup::NoGenesisAllocation,
        Err(err) => {
            warn!(address = %account.address, error = %err, "balance lookup failed");
            BalanceLookup::Unavailable
        }
    }
}

pub async fn lookup_previous_bonds(api: &GenesisApiClient, account: &Account) -> PreviousBondsLookup {
    match api.fetch_previous_bonds(account.public_key_or_empty()).await {
        Ok(bonds) => PreviousBondsLookup::Found(bonds),
        Err(err) => {
            warn!(address = %account.address, error = %err, "bond status lookup failed");
            PreviousBondsLookup::Unavailable
        }
    }
}

/// Runs both lookups one after the other.
pub async fn lookup_account(api: &GenesisApiClient, account: &Account) -> AccountStatus {
    let balance = lookup_balance(api, account).await;
    let previous_bonds = lookup_previous_bonds(api, account).await;
    AccountStatus {
        balance,
        previous_bonds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server::{spawn_routes, Route};
    use crate::config::{GenesisConfig, DEFAULT_VARIANT};

    fn account(address: &str, public_key: &str) -> Account {
        Account {
            address: address.into(),
            public_key: Some(public_key.into()),
            alias: "a".into(),
            is_shielded: false,
        }
    }

    fn api(base: &str) -> GenesisApiClient {
        let config = GenesisConfig::from_variant_with_api_url(DEFAULT_VARIANT, None)
            .unwrap()
            .with_api_base_url(base)
            .unwrap();
        GenesisApiClient::new(&config)
    }

    #[tokio::test]
    async fn missing_balance_is_distinct_from_failures() {
        let (addr, _, handle) = spawn_routes(vec![
            Route {
                prefix: "GET /balance/tnam1ok",
                status_line: "200 OK",
                body: r#"{"balance":"12"}"#.into(),
            },
            Route {
                prefix: "GET /balance/tnam1gone",
                status_line: "404 Not Found",
                body: "{}".into(),
            },
            Route {
                prefix: "GET /balance/tnam1down",
                status_line: "502 Bad Gateway",
                body: "{}".into(),
            },
            Route {
                prefix: "GET /bonds/",
                status_line: "200 OK",
                body: r#"{"bonds":[]}"#.into(),
            },
        ])
        .await;
        let api = api(&format!("http://{addr}"));

        let status = lookup_account(&api, &account("tnam1ok", "tpknam1ok")).await;
        assert_eq!(status.balance, BalanceLookup::Found(Amount::from_whole(12)));
        assert_eq!(status.previous_bonds, PreviousBondsLookup::Found(vec![]));

        assert_eq!(
            lookup_balance(&api, &account("tnam1gone", "x")).await,
            BalanceLookup::NoGenesisAllocation
        );
        assert_eq!(
            lookup_balance(&api, &account("tnam1down", "x")).await,
            BalanceLookup::Unavailable
        );
        handle.abort();
    }

    #[tokio::test]
    async fn unreachable_api_is_swallowed() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = api(&format!("http://{addr}"));
        let status = lookup_account(&api, &account("tnam1x", "tpknam1x")).await;
        assert_eq!(status.balance, BalanceLookup::Unavailable);
        assert_eq!(status.previous_bonds, PreviousBondsLookup::Unavailable);
    }
}
