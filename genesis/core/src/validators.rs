use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

pub const UNKNOWN_ALIAS: &str = "Alias Unknown";
const UNKNOWN_WEBSITE_MARKER: &str = "Unknown website";

/// Validator entry as published by the genesis API and the static mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorRecord {
    pub address: String,
    #[serde(default)]
    pub alias: Option<String>,
    pub commission: String,
    #[serde(default)]
    pub max_commission_rate_change: Option<String>,
    pub total_bond: f64,
    pub total_voting_power: f64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub discord_handle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorInfo {
    pub address: String,
    pub alias: String,
    /// Percentage, 0-100.
    pub commission_rate: f64,
    pub total_bond: f64,
    pub total_voting_power: f64,
    pub email: Option<String>,
    pub website: Option<String>,
    pub discord_handle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidatorOrdering {
    #[default]
    AsListed,
    Shuffled,
    ByVotingPower,
}

impl From<ValidatorRecord> for ValidatorInfo {
    fn from(record: ValidatorRecord) -> Self {
        let website = record
            .website
            .filter(|site| !site.contains(UNKNOWN_WEBSITE_MARKER));
        Self {
            alias: record.alias.unwrap_or_else(|| UNKNOWN_ALIAS.to_string()),
            commission_rate: record.commission.trim().parse().unwrap_or(f64::NAN),
            address: record.address,
            total_bond: record.total_bond,
            total_voting_power: record.total_voting_power,
            email: record.email,
            website,
            discord_handle: record.discord_handle,
        }
    }
}

impl ValidatorInfo {
    pub fn select_option(&self) -> SelectOption {
        SelectOption {
            label: self.alias.clone(),
            value: self.address.clone(),
        }
    }
}

/// Orders a freshly loaded directory for display, then moves `pinned` (when
/// present in the list) to the top.
pub fn order_validators<R: rand::Rng + ?Sized>(
    validators: &mut [ValidatorInfo],
    ordering: ValidatorOrdering,
    pinned: Option<&str>,
    rng: &mut R,
) {
    match ordering {
        ValidatorOrdering::AsListed => {}
        ValidatorOrdering::Shuffled => validators.shuffle(rng),
        ValidatorOrdering::ByVotingPower => validators.sort_by(|a, b| {
            b.total_voting_power
                .total_cmp(&a.total_voting_power)
                .then_with(|| a.alias.cmp(&b.alias))
        }),
    }

    if let Some(pinned) = pinned {
        if let Some(position) = validators.iter().position(|v| v.address == pinned) {
            validators[..=position].rotate_right(1);
        }
    }
}

pub fn select_options(validators: &[ValidatorInfo]) -> Vec<SelectOption> {
    validators.iter().map(ValidatorInfo::select_option).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn validator(address: &str, power: f64) -> ValidatorInfo {
        ValidatorInfo {
            address: address.to_string(),
            alias: format!("alias-{address}"),
            commission_rate: 5.0,
            total_bond: 1000.0,
            total_voting_power: power,
            email: None,
            website: None,
            discord_handle: None,
        }
    }

    #[test]
    fn record_normalization_fills_defaults() {
        let record: ValidatorRecord = serde_json::from_str(
            r#"{
                "address": "tnam1qval",
                "alias": null,
                "commission": "5.5",
                "max_commission_rate_change": "1",
                "total_bond": 12.5,
                "total_voting_power": 0.25,
                "email": "ops@example.com",
                "website": "Unknown website (not provided)",
                "discord_handle": null
            }"#,
        )
        .unwrap();
        let info = ValidatorInfo::from(record);
        assert_eq!(info.alias, UNKNOWN_ALIAS);
        assert_eq!(info.commission_rate, 5.5);
        assert_eq!(info.website, None);
        assert_eq!(info.email.as_deref(), Some("ops@example.com"));
        assert_eq!(
            info.select_option(),
            SelectOption {
                label: UNKNOWN_ALIAS.into(),
                value: "tnam1qval".into()
            }
        );
    }

    #[test]
    fn as_listed_keeps_order_and_pins_to_top() {
        let mut list = vec![validator("a", 1.0), validator("b", 2.0), validator("c", 3.0)];
        let mut rng = StdRng::seed_from_u64(7);
        order_validators(&mut list, ValidatorOrdering::AsListed, Some("c"), &mut rng);
        let order: Vec<_> = list.iter().map(|v| v.address.as_str()).collect();
        assert_eq!(order, ["c", "a", "b"]);
    }

    #[test]
    fn by_voting_power_sorts_descending() {
        let mut list = vec![validator("a", 1.0), validator("b", 3.0), validator("c", 2.0)];
        let mut rng = StdRng::seed_from_u64(7);
        order_validators(&mut list, ValidatorOrdering::ByVotingPower, None, &mut rng);
        let order: Vec<_> = list.iter().map(|v| v.address.as_str()).collect();
        assert_eq!(order, ["b", "c", "a"]);
    }

    #[test]
    fn shuffle_keeps_every_validator_and_pin_wins() {
        let mut list: Vec<_> = (0..20).map(|i| validator(&format!("v{i}"), i as f64)).collect();
        let mut rng = StdRng::seed_from_u64(42);
        order_validators(&mut list, ValidatorOrdering::Shuffled, Some("v13"), &mut rng);
        assert_eq!(list.len(), 20);
        assert_eq!(list[0].address, "v13");
        let mut addresses: Vec<_> = list.iter().map(|v| v.address.clone()).collect();
        addresses.sort();
        addresses.dedup();
        assert_eq!(addresses.len(), 20);
    }

    #[test]
    fn unknown_pin_is_ignored() {
        let mut list = vec![validator("a", 1.0), validator("b", 2.0)];
        let mut rng = StdRng::seed_from_u64(1);
        order_validators(&mut list, ValidatorOrdering::AsListed, Some("zzz"), &mut rng);
        assert_eq!(list[0].address, "a");
    }
}
