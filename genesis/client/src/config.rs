#![forbid(unsafe_code)]

use std::{collections::BTreeMap, ffi::OsStr, fmt};

use genesis_bond_core::ValidatorOrdering;

pub const GENESIS_API_URL_ENV_VAR: &str = "NAMADA_INTERFACE_GENESIS_API_URL";
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_VARIANT: &str = "kintsugi";

pub const GENESIS_CHAIN_ID: &str = "namada-genesis";
pub const NATIVE_TOKEN_ADDRESS: &str = "tnam1qqzywyugkgpp9ptl3702ld8k79lv0memlurnh2hh";

pub const KINTSUGI_VALIDATOR_ADDRESS: &str = "tnam1qydvhqdu2q2vrgvju2ngpt6yhrehu525pus6m28p";
pub const STATIC_MIRROR_BASE_URL: &str = "https://validityops.github.io/namada-bond";

pub const PR_BOT_URL: &str = "https://namada-bond-api.metasig.workers.dev/";
pub const PR_BOT_OWNER: &str = "ValidityOps";
pub const PR_BOT_REPO: &str = "namada-mainnet-genesis";
pub const PR_BOT_BRANCH: &str = "patch-1";

pub const BOND_WASM_NAME: &str = "tx_bond.wasm";
// Genesis transactions are signed against placeholder checksums.
pub const BOND_WASM_CHECKSUM: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceMode {
    /// `GET /validators`, `/balance/:address`, `/bonds/:publicKey`.
    Api,
    /// `validators_data.json`, `balances.json`, `combined_bond_data.json`.
    StaticMirror,
}

/// Branded flavour of the bonding page. The variants only differ in where
/// data comes from and which validator receives the tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrandVariant {
    pub name: &'static str,
    pub data_source: DataSourceMode,
    pub tip_validator_address: &'static str,
    pub validator_ordering: ValidatorOrdering,
    pub pinned_validator: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownVariant { name: String },
    InvalidApiUrl { url: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownVariant { name } => write!(f, "unknown genesis bond variant: {name}"),
            Self::InvalidApiUrl { url } => write!(f, "invalid genesis API url: {url:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}

pub const KNOWN_VARIANTS: [BrandVariant; 2] = [
    BrandVariant {
        name: DEFAULT_VARIANT,
        data_source: DataSourceMode::Api,
        tip_validator_address: KINTSUGI_VALIDATOR_ADDRESS,
        validator_ordering: ValidatorOrdering::AsListed,
        pinned_validator: None,
    },
    BrandVariant {
        name: "validityops",
        data_source: DataSourceMode::StaticMirror,
        tip_validator_address: KINTSUGI_VALIDATOR_ADDRESS,
        validator_ordering: ValidatorOrdering::Shuffled,
        pinned_validator: Some(KINTSUGI_VALIDATOR_ADDRESS),
    },
];

pub fn require_known_variant(name: &str) -> Result<&'static BrandVariant, ConfigError> {
    KNOWN_VARIANTS
        .iter()
        .find(|variant| variant.name == name)
        .ok_or_else(|| ConfigError::UnknownVariant {
            name: name.to_string(),
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrBotConfig {
    pub url: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl Default for PrBotConfig {
    fn default() -> Self {
        Self {
            url: PR_BOT_URL.to_string(),
            owner: PR_BOT_OWNER.to_string(),
            repo: PR_BOT_REPO.to_string(),
            branch: PR_BOT_BRANCH.to_string(),
        }
    }
}

/// Everything the bond workflow needs to know about its deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisConfig {
    pub api_base_url: String,
    pub static_base_url: String,
    pub data_source: DataSourceMode,
    pub tip_validator_address: String,
    pub validator_ordering: ValidatorOrdering,
    pub pinned_validator: Option<String>,
    pub chain_id: String,
    pub native_token: String,
    pub pr_bot: PrBotConfig,
}

impl GenesisConfig {
    pub fn from_variant(variant: &BrandVariant) -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            static_base_url: STATIC_MIRROR_BASE_URL.to_string(),
            data_source: variant.data_source,
            tip_validator_address: variant.tip_validator_address.to_string(),
            validator_ordering: variant.validator_ordering,
            pinned_validator: variant.pinned_validator.map(str::to_string),
            chain_id: GENESIS_CHAIN_ID.to_string(),
            native_token: NATIVE_TOKEN_ADDRESS.to_string(),
            pr_bot: PrBotConfig::default(),
        }
    }

    /// Loads the named variant, honouring [`GENESIS_API_URL_ENV_VAR`].
    pub fn from_env(variant: &str) -> Result<Self, ConfigError> {
        let api_url = std::env::var_os(GENESIS_API_URL_ENV_VAR);
        Self::from_variant_with_api_url(variant, api_url.as_deref())
    }

    pub fn from_variant_with_api_url(
        variant: &str,
        api_url: Option<&OsStr>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::from_variant(require_known_variant(variant)?);
        if let Some(url) = api_url {
            config.api_base_url = normalize_base_url(url)?;
        }
        Ok(config)
    }

    pub fn with_api_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.api_base_url = normalize_base_url(OsStr::new(url))?;
        Ok(self)
    }

    pub fn with_static_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.static_base_url = normalize_base_url(OsStr::new(url))?;
        Ok(self)
    }
}

fn normalize_base_url(url: &OsStr) -> Result<String, ConfigError> {
    let url = url.to_str().ok_or_else(|| ConfigError::InvalidApiUrl {
        url: url.to_string_lossy().into_owned(),
    })?;
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidApiUrl {
            url: url.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Checksum map handed to the signer alongside the bond transactions.
pub fn bond_wasm_checksums() -> BTreeMap<String, String> {
    BTreeMap::from([(BOND_WASM_NAME.to_string(), BOND_WASM_CHECKSUM.to_string())])
}
