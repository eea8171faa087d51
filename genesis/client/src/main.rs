//! `genesis-bond`: command line access to the genesis bond workflow.
//!
//! Signing needs the wallet extension and is not available here; bonds
//! signed elsewhere can be rendered, checked and submitted.

use std::{
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use genesis_bond_client::{
    config::{DataSourceMode, GenesisConfig, DEFAULT_VARIANT, GENESIS_API_URL_ENV_VAR},
    lookup_account, BalanceLookup, BondSubmitter, GenesisApiClient, PrBotClient,
    PreviousBondsLookup,
};
use genesis_bond_core::{
    parse_bond_toml, render_bond_toml, select_options, shorten_address, Account, Amount,
    SignedBond,
};
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "genesis-bond")]
#[command(about = "Genesis bond workflow: validators, balances, bond.toml rendering and submission")]
struct Args {
    /// Brand variant (kintsugi, validityops)
    #[arg(long, env = "GENESIS_BOND_VARIANT", default_value = DEFAULT_VARIANT)]
    variant: String,

    /// Genesis API base URL
    #[arg(long, env = GENESIS_API_URL_ENV_VAR)]
    api_url: Option<String>,

    /// Static mirror base URL
    #[arg(long)]
    static_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the validator directory in display order
    Validators {
        /// Print JSON select options instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the genesis balance and submitted bonds of an account
    Status {
        #[arg(long)]
        address: String,
        #[arg(long)]
        public_key: String,
    },
    /// Show how an amount is split between the validator and the tip
    Split {
        amount: String,
        #[arg(long)]
        no_tip: bool,
    },
    /// Render signed bonds (JSON list) as a bond.toml block
    Render {
        /// JSON file; reads stdin when omitted
        input: Option<PathBuf>,
    },
    /// Submit a signed bond.toml block
    Submit {
        /// bond.toml file; reads stdin when omitted
        input: Option<PathBuf>,
        /// Open a pull request through the bot instead of the genesis API
        #[arg(long)]
        pr_bot: bool,
        /// Discord handle attached to the pull request
        #[arg(long)]
        contact: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,genesis_bond_client=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    match args.command {
        Command::Validators { json } => list_validators(&config, json).await,
        Command::Status {
            address,
            public_key,
        } => show_status(&config, address, public_key).await,
        Command::Split { amount, no_tip } => show_split(&config, &amount, !no_tip),
        Command::Render { input } => {
            let bonds: Vec<SignedBond> = serde_json::from_str(&read_input(input.as_deref())?)
                .context("signed bonds must be a JSON list")?;
            print!("{}", render_bond_toml(&bonds));
            Ok(())
        }
        Command::Submit {
            input,
            pr_bot,
            contact,
        } => submit(&config, input.as_deref(), pr_bot, contact.as_deref()).await,
    }
}

fn load_config(args: &Args) -> Result<GenesisConfig> {
    let mut config = GenesisConfig::from_variant_with_api_url(&args.variant, None)?;
    if let Some(url) = &args.api_url {
        config = config.with_api_base_url(url)?;
    }
    if let Some(url) = &args.static_url {
        config = config.with_static_base_url(url)?;
    }
    info!(
        variant = %args.variant,
        api = %config.api_base_url,
        static_mirror = config.data_source == DataSourceMode::StaticMirror,
        "configuration loaded"
    );
    Ok(config)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

async fn list_validators(config: &GenesisConfig, json: bool) -> Result<()> {
    let api = GenesisApiClient::new(config);
    let mut rng = StdRng::from_entropy();
    let validators = genesis_bond_client::load_validators(&api, config, &mut rng).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&select_options(&validators))?);
        return Ok(());
    }
    for validator in &validators {
        println!(
            "{:<20} {:<32} {:>6.2}% {:>14.0}",
            shorten_address(&validator.address),
            validator.alias,
            validator.commission_rate,
            validator.total_voting_power,
        );
    }
    Ok(())
}

async fn show_status(config: &GenesisConfig, address: String, public_key: String) -> Result<()> {
    let api = GenesisApiClient::new(config);
    let account = Account {
        address,
        public_key: Some(public_key),
        alias: String::new(),
        is_shielded: false,
    };
    let status = lookup_account(&api, &account).await;

    match status.balance {
        BalanceLookup::Found(balance) => println!("balance: {balance}"),
        BalanceLookup::NoGenesisAllocation => {
            println!("balance: {}", genesis_bond_client::error::NO_GENESIS_BALANCE)
        }
        BalanceLookup::Unavailable => println!("balance: unavailable"),
    }
    match status.previous_bonds {
        PreviousBondsLookup::Found(bonds) if bonds.is_empty() => println!("no bonds submitted"),
        PreviousBondsLookup::Found(bonds) => {
            for bond in bonds {
                println!("bond: {} -> {}", bond.amount, bond.validator);
            }
        }
        PreviousBondsLookup::Unavailable => println!("bonds: unavailable"),
    }
    Ok(())
}

fn show_split(config: &GenesisConfig, amount: &str, tip: bool) -> Result<()> {
    let amount = Amount::parse_input(amount)?;
    if amount.is_zero() {
        bail!(genesis_bond_client::error::MISSING_VALUES);
    }
    let split = amount.split(tip);
    println!("validator: {}", split.primary);
    if split.has_tip() {
        println!("tip ({}): {}", shorten_address(&config.tip_validator_address), split.tip);
    }
    Ok(())
}

async fn submit(
    config: &GenesisConfig,
    input: Option<&Path>,
    pr_bot: bool,
    contact: Option<&str>,
) -> Result<()> {
    let bonds = parse_bond_toml(&read_input(input)?)?;
    if bonds.is_empty() {
        bail!("no [[bond]] entries found");
    }

    let submitter: Box<dyn BondSubmitter> = if pr_bot {
        Box::new(PrBotClient::new(config.pr_bot.clone()))
    } else {
        Box::new(GenesisApiClient::new(config))
    };
    let confirmation = submitter
        .submit(&bonds, contact)
        .await
        .map_err(|err| anyhow::anyhow!(err.user_message()))?;
    println!("{confirmation}");
    Ok(())
}
