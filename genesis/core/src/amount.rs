use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Fractional digits of the native token denomination.
pub const NATIVE_DECIMALS: u32 = 6;
/// Fractional digits accepted from the amount input field.
pub const MAX_INPUT_DECIMALS: u32 = 3;

const UNIT: u128 = 10_u128.pow(NATIVE_DECIMALS);

/// Tip share numerator / denominator applied to the primary bond (80%).
const PRIMARY_SHARE_NUM: u128 = 4;
const PRIMARY_SHARE_DEN: u128 = 5;

/// Exact fixed-point token amount, stored in base units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(u128);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    Empty,
    InvalidCharacter { found: char },
    TooManyDecimals { max: u32, actual: usize },
    Overflow,
}

impl fmt::Display for AmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "amount is empty"),
            Self::InvalidCharacter { found } => {
                write!(f, "invalid character in amount: {found:?}")
            }
            Self::TooManyDecimals { max, actual } => {
                write!(f, "amount has {actual} decimal places, at most {max} allowed")
            }
            Self::Overflow => write!(f, "amount is too large"),
        }
    }
}

impl std::error::Error for AmountError {}

/// Primary and tip portions of a user-entered bond amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BondSplit {
    pub primary: Amount,
    pub tip: Amount,
}

impl BondSplit {
    pub fn total(&self) -> Amount {
        Amount(self.primary.0 + self.tip.0)
    }

    pub fn has_tip(&self) -> bool {
        !self.tip.is_zero()
    }
}

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_base_units(raw: u128) -> Self {
        Self(raw)
    }

    pub fn from_whole(tokens: u64) -> Self {
        Self(u128::from(tokens) * UNIT)
    }

    pub const fn base_units(&self) -> u128 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Parses a value typed into the amount field, which is limited to
    /// [`MAX_INPUT_DECIMALS`] fractional digits.
    pub fn parse_input(input: &str) -> Result<Self, AmountError> {
        parse_decimal(input, MAX_INPUT_DECIMALS)
    }

    /// Splits the amount into a primary bond and a tip bond.
    ///
    /// With a tip the primary portion is 80% of the amount rounded up to a
    /// whole token, capped at the amount itself; the tip takes the rest so
    /// that `primary + tip == self` always holds.
    pub fn split(self, with_tip: bool) -> BondSplit {
        if !with_tip {
            return BondSplit {
                primary: self,
                tip: Amount::ZERO,
            };
        }

        // ceil(4 * raw / (5 * UNIT)) computed without overflowing on 4 * raw.
        let divisor = PRIMARY_SHARE_DEN * UNIT;
        let quotient = self.0 / divisor;
        let remainder = self.0 % divisor;
        let whole_tokens =
            quotient * PRIMARY_SHARE_NUM + (remainder * PRIMARY_SHARE_NUM).div_ceil(divisor);

        let primary = whole_tokens
            .checked_mul(UNIT)
            .map_or(self.0, |raw| raw.min(self.0));

        BondSplit {
            primary: Amount(primary),
            tip: Amount(self.0 - primary),
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal(s, NATIVE_DECIMALS)
    }
}

impl TryFrom<String> for Amount {
    type Error = AmountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.to_string()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / UNIT;
        let fraction = self.0 % UNIT;
        if fraction == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{fraction:0width$}", width = NATIVE_DECIMALS as usize);
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

fn parse_decimal(input: &str, max_decimals: u32) -> Result<Amount, AmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AmountError::Empty);
    }

    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (input, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(AmountError::Empty);
    }
    if let Some(found) = whole
        .chars()
        .chain(fraction.chars())
        .find(|c| !c.is_ascii_digit())
    {
        return Err(AmountError::InvalidCharacter { found });
    }
    if fraction.len() > max_decimals as usize {
        return Err(AmountError::TooManyDecimals {
            max: max_decimals,
            actual: fraction.len(),
        });
    }

    let mut raw: u128 = 0;
    for digit in whole.bytes() {
        raw = raw
            .checked_mul(10)
            .and_then(|v| v.checked_add(u128::from(digit - b'0')))
            .ok_or(AmountError::Overflow)?;
    }
    raw = raw.checked_mul(UNIT).ok_or(AmountError::Overflow)?;

    let mut scale = UNIT;
    for digit in fraction.bytes() {
        scale /= 10;
        raw = raw
            .checked_add(u128::from(digit - b'0') * scale)
            .ok_or(AmountError::Overflow)?;
    }

    Ok(Amount(raw))
}
