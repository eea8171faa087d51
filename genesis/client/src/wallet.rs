//! Seam to the browser-extension wallet.
//!
//! The extension is an external collaborator; the workflow only sees it
//! through [`WalletAdapter`] and the [`Signer`] it hands out.

use std::{collections::BTreeMap, fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use genesis_bond_core::Account;
use tracing::{debug, info, warn};

use crate::sdk::TxProps;

pub const DETECT_TRIES: u32 = 5;
pub const DETECT_INTERVAL: Duration = Duration::from_millis(300);
pub const EXTENSION_NOT_INSTALLED: &str = "Extension not installed!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletError(pub String);

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for WalletError {}

/// Signed transaction bytes, one entry per submitted [`TxProps`].
pub type SignedTx = Vec<u8>;

#[async_trait]
pub trait Signer: Send + Sync {
    /// Asks the user to sign `txs` with `signer_address`.
    ///
    /// `Ok(None)` means the extension produced no result, which is how a
    /// dismissed approval window or a disconnected extension shows up.
    async fn sign(
        &self,
        txs: &[TxProps],
        signer_address: &str,
        checksums: &BTreeMap<String, String>,
    ) -> Result<Option<Vec<SignedTx>>, WalletError>;
}

#[async_trait]
pub trait WalletAdapter: Send + Sync {
    fn detect(&self) -> bool;

    async fn connect(&self) -> Result<(), WalletError>;

    async fn accounts(&self) -> Result<Vec<Account>, WalletError>;

    fn signer(&self) -> Option<Arc<dyn Signer>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionAttachStatus {
    PendingDetection,
    NotInstalled,
    Installed,
}

/// Polls `detect()` until it succeeds or `tries` attempts are exhausted.
pub async fn wait_for_extension(
    adapter: &dyn WalletAdapter,
    tries: u32,
    interval: Duration,
) -> ExtensionAttachStatus {
    for attempt in 1..=tries {
        if adapter.detect() {
            debug!(attempt, "wallet extension detected");
            return ExtensionAttachStatus::Installed;
        }
        if attempt < tries {
            tokio::time::sleep(interval).await;
        }
    }
    warn!(tries, "wallet extension not detected");
    ExtensionAttachStatus::NotInstalled
}

/// Connects to the extension and returns its transparent signing accounts.
pub async fn connect_accounts(adapter: &dyn WalletAdapter) -> Result<Vec<Account>, WalletError> {
    if !adapter.detect() {
        return Err(WalletError(EXTENSION_NOT_INSTALLED.to_string()));
    }
    adapter.connect().await?;
    let accounts: Vec<Account> = adapter
        .accounts()
        .await?
        .into_iter()
        .filter(|account| !account.is_shielded)
        .collect();
    info!(count = accounts.len(), "connected to wallet extension");
    Ok(accounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FlakyExtension {
        detect_calls: AtomicU32,
        installed_after: u32,
    }

    #[async_trait]
    impl WalletAdapter for FlakyExtension {
        fn detect(&self) -> bool {
            self.detect_calls.fetch_add(1, Ordering::SeqCst) + 1 >= self.installed_after
        }

        async fn connect(&self) -> Result<(), WalletError> {
            Ok(())
        }

        async fn accounts(&self) -> Result<Vec<Account>, WalletError> {
            Ok(vec![
                Account {
                    address: "tnam1transparent".into(),
                    public_key: Some("tpknam1pk".into()),
                    alias: "main".into(),
                    is_shielded: false,
                },
                Account {
                    address: "znam1shielded".into(),
                    public_key: None,
                    alias: "shielded".into(),
                    is_shielded: true,
                },
            ])
        }

        fn signer(&self) -> Option<Arc<dyn Signer>> {
            None
        }
    }

    fn extension(installed_after: u32) -> FlakyExtension {
        FlakyExtension {
            detect_calls: AtomicU32::new(0),
            installed_after,
        }
    }

    #[tokio::test]
    async fn detection_retries_until_installed() {
        let ext = extension(3);
        let status = wait_for_extension(&ext, DETECT_TRIES, Duration::from_millis(1)).await;
        assert_eq!(status, ExtensionAttachStatus::Installed);
        assert_eq!(ext.detect_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn detection_gives_up_after_tries() {
        let ext = extension(u32::MAX);
        let status = wait_for_extension(&ext, DETECT_TRIES, Duration::from_millis(1)).await;
        assert_eq!(status, ExtensionAttachStatus::NotInstalled);
        assert_eq!(ext.detect_calls.load(Ordering::SeqCst), DETECT_TRIES);
    }

    #[tokio::test]
    async fn connect_filters_shielded_accounts() {
        let ext = extension(0);
        let accounts = connect_accounts(&ext).await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].address, "tnam1transparent");
    }

    #[tokio::test]
    async fn connect_fails_without_extension() {
        let ext = extension(u32::MAX);
        let err = connect_accounts(&ext).await.unwrap_err();
        assert_eq!(err.to_string(), EXTENSION_NOT_INSTALLED);
    }
}
