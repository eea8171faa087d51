//! The bond form: one configurable workflow driving lookup, building,
//! signing and dispatch for the selected account.

use std::sync::Arc;

use genesis_bond_core::{Account, Amount, PreviousBond, SignedBond, ValidatorInfo};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, warn};

use crate::{
    api::GenesisApiClient,
    builder::{build_bonds, plan_bonds, BondRequest},
    config::GenesisConfig,
    directory::load_validators,
    dispatch::{dispatch_automatic, dispatch_manual, BondSubmitter, Dispatched, MANUAL_SUCCESS_MESSAGE},
    error::{BondError, Result, CHAIN_ID_MISMATCH_HELP, MISSING_VALUES},
    lookup::{lookup_account, BalanceLookup, PreviousBondsLookup},
    sdk::BondSdk,
    signing::sign_bonds,
    wallet::WalletAdapter,
};

pub const SIGN_BOND_LABEL: &str = "Sign Bond";
pub const EDIT_BONDS_LABEL: &str = "Edit Bonds";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Building,
    Signing,
    ReadyToCopy,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Previous bonds exist; the click only unlocked editing.
    EditingEnabled,
    /// A submission attempt ran to completion (successfully or not).
    Submitted,
    /// A submission is already in flight or the form is disabled.
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub account: Option<Account>,
    pub validator: String,
    pub amount: Option<Amount>,
    pub balance: Amount,
    pub automatic: bool,
    pub tip: bool,
    pub contact: String,
    pub previous_bonds: Vec<PreviousBond>,
    pub editing_bonds: bool,
    pub loading: bool,
    pub phase: Phase,
    pub success: Option<String>,
    pub error: Option<String>,
    pub error_code: Option<&'static str>,
    /// Blocks the whole form, e.g. when the account has no genesis balance.
    pub disabling_error: Option<String>,
    /// Rendered TOML for manual submission.
    pub bonds: Option<String>,
    pub validators: Vec<ValidatorInfo>,
    pub validators_available: bool,
}

pub struct BondForm {
    config: GenesisConfig,
    api: GenesisApiClient,
    wallet: Arc<dyn WalletAdapter>,
    sdk: Arc<dyn BondSdk>,
    submitter: Arc<dyn BondSubmitter>,
    state: FormState,
}

impl BondForm {
    pub fn new(
        config: GenesisConfig,
        wallet: Arc<dyn WalletAdapter>,
        sdk: Arc<dyn BondSdk>,
        submitter: Arc<dyn BondSubmitter>,
    ) -> Self {
        let api = GenesisApiClient::new(&config);
        Self::with_api(config, api, wallet, sdk, submitter)
    }

    pub fn with_api(
        config: GenesisConfig,
        api: GenesisApiClient,
        wallet: Arc<dyn WalletAdapter>,
        sdk: Arc<dyn BondSdk>,
        submitter: Arc<dyn BondSubmitter>,
    ) -> Self {
        let state = FormState {
            automatic: true,
            ..FormState::default()
        };
        Self {
            config,
            api,
            wallet,
            sdk,
            submitter,
            state,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn config(&self) -> &GenesisConfig {
        &self.config
    }

    /// Fetches the validator directory. On failure the form reports no
    /// validators and stays non-interactable.
    pub async fn load_validators(&mut self) {
        let mut rng = StdRng::from_entropy();
        match load_validators(&self.api, &self.config, &mut rng).await {
            Ok(validators) => {
                self.state.validators = validators;
                self.state.validators_available = true;
            }
            Err(_) => {
                self.state.validators.clear();
                self.state.validators_available = false;
            }
        }
    }

    /// Pre-selects the validator named by the `validator` query parameter.
    pub fn apply_query(&mut self, validator: Option<&str>) {
        if let Some(validator) = validator.map(str::trim).filter(|v| !v.is_empty()) {
            debug!(%validator, "validator pre-selected from query");
            self.state.validator = validator.to_string();
        }
    }

    pub async fn select_account(&mut self, account: Account) {
        self.state.account = Some(account);
        self.clear_outcome();
        self.state.balance = Amount::ZERO;
        self.state.disabling_error = None;
        self.state.previous_bonds.clear();
        self.state.editing_bonds = false;
        self.refresh_account_status().await;
    }

    /// Re-reads balance and previous bonds for the selected account.
    ///
    /// A missing genesis balance disables the form; any other lookup failure
    /// leaves the current values in place.
    pub async fn refresh_account_status(&mut self) {
        let Some(account) = self.state.account.clone() else {
            return;
        };
        let status = lookup_account(&self.api, &account).await;
        match status.balance {
            BalanceLookup::Found(balance) => self.state.balance = balance,
            BalanceLookup::NoGenesisAllocation => {
                let err = BondError::NoBalanceFound {
                    address: account.address.clone(),
                };
                self.state.disabling_error = Some(err.user_message());
            }
            BalanceLookup::Unavailable => {}
        }
        if let PreviousBondsLookup::Found(bonds) = status.previous_bonds {
            self.state.previous_bonds = bonds;
        }
    }

    pub fn select_validator(&mut self, validator: &str) {
        self.state.validator = validator.to_string();
    }

    /// Parses the amount field. Unparseable input clears the amount, which
    /// then fails validation on submit.
    pub fn set_amount_input(&mut self, input: &str) {
        self.state.amount = match Amount::parse_input(input) {
            Ok(amount) => Some(amount),
            Err(err) => {
                debug!(error = %err, "amount input rejected");
                None
            }
        };
    }

    pub fn set_amount(&mut self, amount: Option<Amount>) {
        self.state.amount = amount;
    }

    pub fn set_tip(&mut self, tip: bool) {
        self.state.tip = tip;
    }

    pub fn set_contact(&mut self, contact: &str) {
        self.state.contact = contact.to_string();
    }

    /// Switching delivery mode discards the outcome of the previous attempt.
    pub fn set_automatic(&mut self, automatic: bool) {
        self.state.automatic = automatic;
        self.clear_outcome();
    }

    fn clear_outcome(&mut self) {
        if self.state.loading {
            return;
        }
        self.state.phase = Phase::Idle;
        self.state.success = None;
        self.state.error = None;
        self.state.error_code = None;
        self.state.bonds = None;
    }

    pub fn has_previous_bonds(&self) -> bool {
        !self.state.previous_bonds.is_empty()
    }

    pub fn button_label(&self) -> &'static str {
        if self.has_previous_bonds() {
            EDIT_BONDS_LABEL
        } else {
            SIGN_BOND_LABEL
        }
    }

    pub fn is_interactable(&self) -> bool {
        self.state.validators_available
            && self.state.disabling_error.is_none()
            && self.state.account.is_some()
    }

    pub fn submit_disabled(&self) -> bool {
        self.state.loading || !self.is_interactable()
    }

    /// Extra guidance shown under a chain id mismatch.
    pub fn error_help(&self) -> Option<&'static str> {
        self.state.error_code.map(|_| CHAIN_ID_MISMATCH_HELP)
    }

    /// The single form button.
    pub async fn click(&mut self) -> ClickOutcome {
        if self.submit_disabled() {
            return ClickOutcome::Ignored;
        }
        if self.has_previous_bonds() && !self.state.editing_bonds {
            self.state.editing_bonds = true;
            return ClickOutcome::EditingEnabled;
        }
        self.handle_submit().await
    }

    pub async fn handle_submit(&mut self) -> ClickOutcome {
        if self.submit_disabled() {
            return ClickOutcome::Ignored;
        }
        self.state.loading = true;
        self.state.success = None;
        self.state.error = None;
        self.state.error_code = None;
        self.state.bonds = None;

        match self.run_submission().await {
            Ok(Dispatched::Manual { toml }) => {
                self.state.bonds = Some(toml);
                self.state.success = Some(MANUAL_SUCCESS_MESSAGE.to_string());
                self.state.phase = Phase::ReadyToCopy;
            }
            Ok(Dispatched::Submitted { confirmation }) => {
                self.state.success = Some(confirmation);
                self.state.phase = Phase::Succeeded;
            }
            Err(err) => {
                warn!(error = %err, "bond submission failed");
                self.state.error = Some(err.user_message());
                self.state.error_code = err.error_code();
                self.state.phase = Phase::Failed;
            }
        }
        self.state.loading = false;
        ClickOutcome::Submitted
    }

    async fn run_submission(&mut self) -> Result<Dispatched> {
        self.state.phase = Phase::Building;
        let Some(account) = self.state.account.clone() else {
            return Err(BondError::InvalidInput(MISSING_VALUES));
        };
        let request = BondRequest {
            account: Some(&account),
            validator: &self.state.validator,
            amount: self.state.amount,
            balance: self.state.balance,
            tip: self.state.tip,
        };
        let intents = plan_bonds(&self.config, &request)?;
        let built = build_bonds(&self.config, self.sdk.as_ref(), &account, intents).await?;

        self.state.phase = Phase::Signing;
        let signed = sign_bonds(self.wallet.as_ref(), self.sdk.as_ref(), &account, &built).await?;
        info!(bonds = signed.len(), automatic = self.state.automatic, "bonds signed");

        if !self.state.automatic {
            return Ok(dispatch_manual(&signed));
        }
        self.state.phase = Phase::Submitting;
        self.submit_signed(&signed).await
    }

    async fn submit_signed(&self, signed: &[SignedBond]) -> Result<Dispatched> {
        let contact = Some(self.state.contact.trim()).filter(|c| !c.is_empty());
        dispatch_automatic(self.submitter.as_ref(), signed, contact).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::DEFAULT_VARIANT,
        error::{INSUFFICIENT_BALANCE, MISSING_VALIDATOR},
        sdk::{SdkError, TxProps, WrapperTxProps},
        wallet::{Signer, WalletError},
    };
    use async_trait::async_trait;
    use genesis_bond_core::BondProps;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NoWallet;

    #[async_trait]
    impl WalletAdapter for NoWallet {
        fn detect(&self) -> bool {
            false
        }
        async fn connect(&self) -> std::result::Result<(), WalletError> {
            Ok(())
        }
        async fn accounts(&self) -> std::result::Result<Vec<Account>, WalletError> {
            Ok(vec![])
        }
        fn signer(&self) -> Option<Arc<dyn Signer>> {
            None
        }
    }

    #[derive(Default)]
    struct CountingSdk {
        builds: AtomicUsize,
    }

    #[async_trait]
    impl BondSdk for CountingSdk {
        async fn build_bond(
            &self,
            wrapper: &WrapperTxProps,
            _bond: &BondProps,
        ) -> std::result::Result<TxProps, SdkError> {
            self.builds.fetch_add(1, Ordering::SeqCst);
            Ok(TxProps {
                args: wrapper.clone(),
                hash: "h".into(),
                bytes: vec![],
            })
        }
        async fn get_tx_signature(
            &self,
            _signed_tx: &[u8],
            _public_key: &str,
        ) -> std::result::Result<Vec<u8>, SdkError> {
            Err(SdkError("unused".into()))
        }
    }

    struct NeverSubmit;

    #[async_trait]
    impl BondSubmitter for NeverSubmit {
        async fn submit(&self, _bonds: &[SignedBond], _contact: Option<&str>) -> Result<String> {
            panic!("submission must not run");
        }
    }

    fn form(sdk: Arc<CountingSdk>) -> BondForm {
        let config = GenesisConfig::from_variant_with_api_url(DEFAULT_VARIANT, None).unwrap();
        BondForm::new(config, Arc::new(NoWallet), sdk, Arc::new(NeverSubmit))
    }

    fn account() -> Account {
        Account {
            address: "tnam1qsource".into(),
            public_key: Some("tpknam1pk".into()),
            alias: "main".into(),
            is_shielded: false,
        }
    }

    fn ready(form: &mut BondForm) {
        form.state.account = Some(account());
        form.state.validators_available = true;
    }

    #[test]
    fn new_form_submits_automatically_without_tip() {
        let form = form(Arc::default());
        assert!(form.state().automatic);
        assert!(!form.state().tip);
        assert_eq!(form.state().phase, Phase::Idle);
    }

    #[test]
    fn label_follows_previous_bonds() {
        let mut form = form(Arc::default());
        assert_eq!(form.button_label(), SIGN_BOND_LABEL);
        form.state.previous_bonds.push(PreviousBond {
            source: "tpknam1pk".into(),
            validator: "tnam1v".into(),
            amount: "10".into(),
        });
        assert_eq!(form.button_label(), EDIT_BONDS_LABEL);
    }

    #[tokio::test]
    async fn first_click_with_previous_bonds_only_unlocks_editing() {
        let sdk = Arc::new(CountingSdk::default());
        let mut form = form(sdk.clone());
        ready(&mut form);
        form.state.previous_bonds.push(PreviousBond {
            source: "tpknam1pk".into(),
            validator: "tnam1v".into(),
            amount: "10".into(),
        });

        assert_eq!(form.click().await, ClickOutcome::EditingEnabled);
        assert!(form.state().editing_bonds);
        assert_eq!(sdk.builds.load(Ordering::SeqCst), 0);
        assert_eq!(form.state().phase, Phase::Idle);
    }

    #[tokio::test]
    async fn validation_errors_reach_the_banner() {
        let sdk = Arc::new(CountingSdk::default());
        let mut form = form(sdk.clone());
        ready(&mut form);
        form.state.balance = Amount::from_whole(5);

        form.handle_submit().await;
        assert_eq!(form.state().error.as_deref(), Some(MISSING_VALUES));

        form.set_amount_input("10");
        form.handle_submit().await;
        assert_eq!(form.state().error.as_deref(), Some(MISSING_VALIDATOR));

        form.select_validator("tnam1v");
        form.handle_submit().await;
        assert_eq!(form.state().error.as_deref(), Some(INSUFFICIENT_BALANCE));
        assert_eq!(form.state().phase, Phase::Failed);
        assert!(!form.state().loading);
        assert_eq!(sdk.builds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn toggling_automatic_clears_outcome() {
        let mut form = form(Arc::default());
        form.state.success = Some("done".into());
        form.state.error = Some("bad".into());
        form.state.bonds = Some("[[bond]]".into());
        form.state.phase = Phase::Failed;

        form.set_automatic(false);
        assert!(!form.state().automatic);
        assert_eq!(form.state().success, None);
        assert_eq!(form.state().error, None);
        assert_eq!(form.state().bonds, None);
        assert_eq!(form.state().phase, Phase::Idle);
    }

    #[tokio::test]
    async fn disabled_form_ignores_clicks() {
        let sdk = Arc::new(CountingSdk::default());
        let mut form = form(sdk.clone());
        form.state.account = Some(account());
        form.state.validator = "tnam1v".into();
        form.state.balance = Amount::from_whole(500);
        form.set_amount_input("100");

        assert_eq!(form.click().await, ClickOutcome::Ignored);
        assert_eq!(form.handle_submit().await, ClickOutcome::Ignored);

        form.state.validators_available = true;
        form.state.disabling_error = Some("no balance".into());
        assert_eq!(form.click().await, ClickOutcome::Ignored);
        assert_eq!(form.state().phase, Phase::Idle);
        assert_eq!(form.state().error, None);
        assert_eq!(sdk.builds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn query_preselects_validator() {
        let mut form = form(Arc::default());
        form.apply_query(Some("  "));
        assert_eq!(form.state().validator, "");
        form.apply_query(Some("tnam1v"));
        assert_eq!(form.state().validator, "tnam1v");
    }

    #[test]
    fn form_without_validators_is_not_interactable() {
        let mut form = form(Arc::default());
        form.state.account = Some(account());
        assert!(!form.is_interactable());
        assert!(form.submit_disabled());

        form.state.validators_available = true;
        assert!(form.is_interactable());
        form.state.disabling_error = Some("no balance".into());
        assert!(form.submit_disabled());
    }
}
