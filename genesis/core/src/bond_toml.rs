//! The `signed-bond.toml` block submitted to the genesis repository.
//!
//! Each bond renders as:
//!
//! ```text
//! [[bond]]
//! source = "<public key>"
//! validator = "<validator address>"
//! amount = "<amount>"
//!
//! [bond.signatures]
//! <pub_key> = "<signature>"
//! ```

use std::fmt;

use crate::{Amount, GenesisSignature, SignedBond};

pub const BOND_TABLE_HEADER: &str = "[[bond]]";
pub const SIGNATURES_TABLE_HEADER: &str = "[bond.signatures]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BondTomlError {
    EntryOutsideBond { line: usize },
    MalformedEntry { line: usize },
    UnquotedValue { line: usize },
    UnknownKey { line: usize, key: String },
    MissingField { bond: usize, field: &'static str },
    InvalidAmount { line: usize, message: String },
}

impl fmt::Display for BondTomlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntryOutsideBond { line } => {
                write!(f, "line {line}: entry appears before any [[bond]] table")
            }
            Self::MalformedEntry { line } => {
                write!(f, "line {line}: expected `key = \"value\"`")
            }
            Self::UnquotedValue { line } => write!(f, "line {line}: value must be quoted"),
            Self::UnknownKey { line, key } => write!(f, "line {line}: unknown key {key:?}"),
            Self::MissingField { bond, field } => {
                write!(f, "bond #{bond} is missing `{field}`")
            }
            Self::InvalidAmount { line, message } => {
                write!(f, "line {line}: invalid amount: {message}")
            }
        }
    }
}

impl std::error::Error for BondTomlError {}

pub fn render_bond_toml(bonds: &[SignedBond]) -> String {
    let mut out = String::new();
    for bond in bonds {
        out.push_str(BOND_TABLE_HEADER);
        out.push('\n');
        out.push_str(&format!("source = \"{}\"\n", bond.source));
        out.push_str(&format!("validator = \"{}\"\n", bond.validator));
        out.push_str(&format!("amount = \"{}\"\n\n", bond.amount));
        out.push_str(SIGNATURES_TABLE_HEADER);
        out.push('\n');
        for signature in &bond.signatures {
            out.push_str(&format!("{} = \"{}\"\n", signature.pub_key, signature.signature));
        }
        out.push('\n');
    }
    out
}

#[derive(Default)]
struct PartialBond {
    source: Option<String>,
    validator: Option<String>,
    amount: Option<Amount>,
    signatures: Vec<GenesisSignature>,
}

impl PartialBond {
    fn finish(self, bond: usize) -> Result<SignedBond, BondTomlError> {
        Ok(SignedBond {
            source: self.source.ok_or(BondTomlError::MissingField { bond, field: "source" })?,
            validator: self
                .validator
                .ok_or(BondTomlError::MissingField { bond, field: "validator" })?,
            amount: self.amount.ok_or(BondTomlError::MissingField { bond, field: "amount" })?,
            signatures: self.signatures,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Bond,
    Signatures,
}

/// Parses a block produced by [`render_bond_toml`].
pub fn parse_bond_toml(input: &str) -> Result<Vec<SignedBond>, BondTomlError> {
    let mut bonds = Vec::new();
    let mut current: Option<(PartialBond, Section)> = None;

    for (index, raw_line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line == BOND_TABLE_HEADER {
            if let Some((partial, _)) = current.take() {
                bonds.push(partial.finish(bonds.len() + 1)?);
            }
            current = Some((PartialBond::default(), Section::Bond));
            continue;
        }

        let Some((partial, section)) = current.as_mut() else {
            return Err(BondTomlError::EntryOutsideBond { line: line_no });
        };

        if line == SIGNATURES_TABLE_HEADER {
            *section = Section::Signatures;
            continue;
        }

        let (key, value) = split_entry(line, line_no)?;
        match (*section, key) {
            (Section::Signatures, pub_key) => partial.signatures.push(GenesisSignature {
                pub_key: pub_key.to_string(),
                signature: value.to_string(),
            }),
            (Section::Bond, "source") => partial.source = Some(value.to_string()),
            (Section::Bond, "validator") => partial.validator = Some(value.to_string()),
            (Section::Bond, "amount") => {
                let amount = value.parse().map_err(|err: crate::AmountError| {
                    BondTomlError::InvalidAmount {
                        line: line_no,
                        message: err.to_string(),
                    }
                })?;
                partial.amount = Some(amount);
            }
            (Section::Bond, other) => {
                return Err(BondTomlError::UnknownKey {
                    line: line_no,
                    key: other.to_string(),
                })
            }
        }
    }

    if let Some((partial, _)) = current {
        bonds.push(partial.finish(bonds.len() + 1)?);
    }
    Ok(bonds)
}

fn split_entry(line: &str, line_no: usize) -> Result<(&str, &str), BondTomlError> {
    let (key, value) = line
        .split_once('=')
        .ok_or(BondTomlError::MalformedEntry { line: line_no })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(BondTomlError::MalformedEntry { line: line_no });
    }
    let value = value
        .trim()
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(BondTomlError::UnquotedValue { line: line_no })?;
    Ok((key, value))
}
