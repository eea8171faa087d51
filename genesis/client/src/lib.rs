#![forbid(unsafe_code)]

//! Client side of the genesis bond workflow.
//!
//! The wallet extension and the transaction SDK are injected through the
//! [`WalletAdapter`] and [`BondSdk`] traits; the genesis API, its static
//! mirror and the pull-request bot are reached over HTTP.

pub mod api;
pub mod builder;
pub mod config;
pub mod directory;
pub mod dispatch;
pub mod error;
pub mod lookup;
pub mod sdk;
pub mod signing;
pub mod wallet;
pub mod workflow;

pub use api::{BalanceStatus, GenesisApiClient};
pub use builder::{build_bonds, plan_bonds, BondRequest, BuiltBonds};
pub use config::{DataSourceMode, GenesisConfig, PrBotConfig};
pub use directory::load_validators;
pub use dispatch::{dispatch_automatic, dispatch_manual, BondSubmitter, Dispatched, PrBotClient};
pub use error::{BondError, Result};
pub use lookup::{lookup_account, AccountStatus, BalanceLookup, PreviousBondsLookup};
pub use sdk::{BondSdk, SdkError, TxProps, WrapperTxProps};
pub use signing::sign_bonds;
pub use wallet::{connect_accounts, wait_for_extension, Signer, SignedTx, WalletAdapter, WalletError};
pub use workflow::{BondForm, ClickOutcome, FormState, Phase};
