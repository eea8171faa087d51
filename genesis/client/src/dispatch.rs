//! Delivery of signed bonds: a TOML block for a hand-made pull request, or
//! automatic submission to the genesis API or the pull-request bot.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use genesis_bond_core::{render_bond_toml, SignedBond};
use rand::Rng;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

use crate::{
    config::PrBotConfig,
    error::{BondError, Result},
};

pub const MANUAL_SUCCESS_MESSAGE: &str = "Your bond transaction has been signed correctly! \
Please copy paste the signed bond.toml from the below box, and open a pull request on GitHub \
yourself following this guide.";

const ANON_LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const ANON_SUFFIX_LEN: usize = 4;

#[async_trait]
pub trait BondSubmitter: Send + Sync {
    /// Submits signed bonds and returns the confirmation to show the user.
    async fn submit(&self, bonds: &[SignedBond], contact: Option<&str>) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// TOML block for the user to paste into a pull request.
    Manual { toml: String },
    /// Confirmation returned by the submission endpoint.
    Submitted { confirmation: String },
}

pub fn dispatch_manual(bonds: &[SignedBond]) -> Dispatched {
    Dispatched::Manual {
        toml: render_bond_toml(bonds),
    }
}

pub async fn dispatch_automatic(
    submitter: &dyn BondSubmitter,
    bonds: &[SignedBond],
    contact: Option<&str>,
) -> Result<Dispatched> {
    let confirmation = submitter.submit(bonds, contact).await?;
    Ok(Dispatched::Submitted { confirmation })
}

// ============================================================================
// PR BOT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrFile {
    pub path: String,
    /// Base64 of the file body.
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrBotPayload {
    pub owner: String,
    pub repo: String,
    pub title: String,
    pub commit: String,
    pub branch: String,
    pub discord_handle: String,
    pub files: Vec<PrFile>,
}

/// `transactions/<handle>-bond.toml` file name, with `@`/`#` stripped from
/// the handle. Anonymous submissions get a random four-letter tag.
pub fn bond_file_name<R: Rng + ?Sized>(contact: Option<&str>, rng: &mut R) -> String {
    let handle: String = contact
        .unwrap_or_default()
        .chars()
        .filter(|c| *c != '@' && *c != '#')
        .collect::<String>()
        .trim()
        .to_lowercase();
    let stem = if handle.is_empty() {
        let tag: String = (0..ANON_SUFFIX_LEN)
            .map(|_| char::from(ANON_LETTERS[rng.gen_range(0..ANON_LETTERS.len())]))
            .collect();
        format!("anon-{tag}")
    } else {
        handle
    };
    format!("{stem}-bond.toml")
}

pub fn pr_bot_payload(
    config: &PrBotConfig,
    bonds: &[SignedBond],
    contact: Option<&str>,
    file_name: &str,
) -> PrBotPayload {
    let title = format!("Add {file_name}");
    PrBotPayload {
        owner: config.owner.clone(),
        repo: config.repo.clone(),
        commit: title.clone(),
        title,
        branch: config.branch.clone(),
        discord_handle: contact.unwrap_or_default().to_string(),
        files: vec![PrFile {
            path: format!("transactions/{file_name}"),
            content: STANDARD.encode(render_bond_toml(bonds)),
        }],
    }
}

#[derive(Clone)]
pub struct PrBotClient {
    config: PrBotConfig,
    client: Client,
}

impl PrBotClient {
    pub fn new(config: PrBotConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl BondSubmitter for PrBotClient {
    async fn submit(&self, bonds: &[SignedBond], contact: Option<&str>) -> Result<String> {
        let file_name = bond_file_name(contact, &mut rand::thread_rng());
        let payload = pr_bot_payload(&self.config, bonds, contact, &file_name);

        let response = self
            .client
            .post(&self.config.url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                error!(error = %err, "pull request bot unreachable");
                BondError::Submission(format!("PR creation failed: {err}"))
            })?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            error!(status = status.as_u16(), "pull request bot rejected bonds");
            return Err(BondError::Submission(format!(
                "PR creation failed: status {}",
                status.as_u16()
            )));
        }

        info!(file = %file_name, "pull request created");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server::{spawn_routes, Route};
    use genesis_bond_core::{parse_bond_toml, Amount, GenesisSignature};
    use rand::{rngs::StdRng, SeedableRng};

    fn bonds() -> Vec<SignedBond> {
        vec![SignedBond {
            source: "tpknam1pk".into(),
            validator: "tnam1v".into(),
            amount: Amount::from_whole(100),
            signatures: vec![GenesisSignature {
                pub_key: "tpknam1pk".into(),
                signature: "sig".into(),
            }],
        }]
    }

    #[test]
    fn manual_dispatch_renders_toml() {
        let Dispatched::Manual { toml } = dispatch_manual(&bonds()) else {
            panic!("manual dispatch must render toml");
        };
        assert_eq!(parse_bond_toml(&toml).unwrap(), bonds());
    }

    #[test]
    fn file_name_strips_handle_markers() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(bond_file_name(Some("@Alice#1234"), &mut rng), "alice1234-bond.toml");
    }

    #[test]
    fn anonymous_file_name_gets_random_tag() {
        let mut rng = StdRng::seed_from_u64(3);
        for contact in [None, Some(""), Some("@#")] {
            let name = bond_file_name(contact, &mut rng);
            let tag = name
                .strip_prefix("anon-")
                .and_then(|rest| rest.strip_suffix("-bond.toml"))
                .expect("anonymous name shape");
            assert_eq!(tag.len(), ANON_SUFFIX_LEN);
            assert!(tag.chars().all(|c| c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn payload_targets_transactions_folder() {
        let payload = pr_bot_payload(
            &PrBotConfig::default(),
            &bonds(),
            Some("alice"),
            "alice-bond.toml",
        );
        assert_eq!(payload.owner, "ValidityOps");
        assert_eq!(payload.repo, "namada-mainnet-genesis");
        assert_eq!(payload.branch, "patch-1");
        assert_eq!(payload.title, "Add alice-bond.toml");
        assert_eq!(payload.commit, payload.title);
        assert_eq!(payload.files[0].path, "transactions/alice-bond.toml");
        let decoded = STANDARD.decode(&payload.files[0].content).unwrap();
        assert_eq!(
            parse_bond_toml(std::str::from_utf8(&decoded).unwrap()).unwrap(),
            bonds()
        );

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["discordHandle"], "alice");
    }

    #[tokio::test]
    async fn pr_bot_returns_response_body() {
        let (addr, requests, handle) = spawn_routes(vec![Route {
            prefix: "POST /",
            status_line: "200 OK",
            body: r#"{"url":"https://github.com/ValidityOps/namada-mainnet-genesis/pull/1"}"#.into(),
        }])
        .await;
        let client = PrBotClient::new(PrBotConfig {
            url: format!("http://{addr}/"),
            ..PrBotConfig::default()
        });

        let body = dispatch_automatic(&client, &bonds(), Some("alice")).await.unwrap();
        assert_eq!(
            body,
            Dispatched::Submitted {
                confirmation: r#"{"url":"https://github.com/ValidityOps/namada-mainnet-genesis/pull/1"}"#
                    .into()
            }
        );
        assert!(requests.lock().await[0].contains("\"discordHandle\":\"alice\""));
        handle.abort();
    }

    #[tokio::test]
    async fn pr_bot_failure_is_a_submission_error() {
        let (addr, _, handle) = spawn_routes(vec![Route {
            prefix: "POST /",
            status_line: "500 Internal Server Error",
            body: "{}".into(),
        }])
        .await;
        let client = PrBotClient::new(PrBotConfig {
            url: format!("http://{addr}/"),
            ..PrBotConfig::default()
        });

        let err = client.submit(&bonds(), None).await.unwrap_err();
        assert!(matches!(err, BondError::Submission(_)));
        handle.abort();
    }
}
