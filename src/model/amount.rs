//! Amount type for handling signed monetary values.
//!
//! This module provides the `Amount` type which wraps `Decimal`, holds it at cent precision, and
//! handles parsing values that may or may not include a dollar sign and commas.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, Neg};
use std::str::FromStr;

/// The number of fractional digits an `Amount` is held at and written with.
const CENTS: u32 = 2;

/// Parsed amounts are strictly smaller than this in magnitude (10^15 dollars).
// `Decimal::new` is not a `const fn`; these parts encode 1_000_000_000_000_000 at scale 0.
const LIMIT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Represents a signed dollar amount. Positive amounts are money in, negative amounts are money
/// out.
///
/// The value is rounded to cents (half away from zero) on construction so that what is written to
/// the ledger file is exactly what is held in memory.
///
/// # Examples
///
/// Parsing with dollar sign and commas:
/// ```
/// # use pocket_ledger::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("-$1,050.5").unwrap();
/// assert_eq!(amount.to_string(), "-1050.50");
/// assert_eq!(amount.money(), "-$1,050.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    pub const ZERO: Amount = Amount {
        value: Decimal::ZERO,
    };

    /// Creates a new Amount from a Decimal value, rounding it to cents.
    pub fn new(value: Decimal) -> Self {
        Self {
            value: value.round_dp_with_strategy(CENTS, RoundingStrategy::MidpointAwayFromZero),
        }
    }

    /// Parses the amount field of a ledger line. Unlike `from_str` this accepts only a plain
    /// decimal number (surrounding whitespace is tolerated), e.g. `-4.50`. Digit separators such
    /// as `_` are rejected.
    pub fn parse_plain(s: &str) -> Result<Self, AmountError> {
        checked(s.trim())
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Returns true if the amount is greater than zero.
    pub fn is_positive(&self) -> bool {
        self.value > Decimal::ZERO
    }

    /// Returns true if the amount is less than zero. A negative zero is not negative.
    pub fn is_negative(&self) -> bool {
        self.value < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Self {
            value: self.value.abs(),
        }
    }

    /// Formats the amount for people rather than for the ledger file, e.g. `-$60,000.00`.
    pub fn money(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.value.abs().to_f64().unwrap_or_default();
        format!("{sign}${}", format_num::format_num!(",.2", num))
    }
}

/// An error that can occur when parsing strings into amounts.
#[derive(Debug, thiserror::Error)]
pub enum AmountError {
    /// The text is not a decimal number.
    #[error(transparent)]
    Decimal(#[from] rust_decimal::Error),

    /// `rust_decimal` silently skips underscores, so they are rejected up front.
    #[error("unexpected '_' in amount '{0}'")]
    Underscore(String),

    /// The magnitude is 10^15 or more.
    #[error("amount '{0}' is out of range")]
    OutOfRange(String),
}

/// Parses a plain decimal number into a bounded `Amount`.
fn checked(s: &str) -> Result<Amount, AmountError> {
    if s.contains('_') {
        return Err(AmountError::Underscore(s.to_string()));
    }
    let value = Decimal::from_str(s)?;
    if value.abs() >= LIMIT {
        return Err(AmountError::OutOfRange(s.to_string()));
    }
    Ok(Amount::new(value))
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Lenient parsing for amounts typed by a person: `50`, `-50.00`, `$50`, `-$1,000.00`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // Remove dollar sign if present
        let without_dollar = if let Some(after_minus) = trimmed.strip_prefix('-') {
            match after_minus.strip_prefix('$') {
                Some(after_dollar) => format!("-{after_dollar}"),
                None => trimmed.to_string(),
            }
        } else if let Some(after_dollar) = trimmed.strip_prefix('$') {
            after_dollar.to_string()
        } else {
            trimmed.to_string()
        };

        // Remove commas (thousand separators)
        let without_commas = without_dollar.replace(',', "");

        checked(&without_commas)
    }
}

/// The canonical ledger rendering: exactly two fractional digits and no dollar sign.
impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut value = self.value;
        value.rescale(CENTS);
        write!(f, "{value}")
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

impl Add for Amount {
    type Output = Amount;

    /// Saturates at the bounds of `Decimal` rather than panicking.
    fn add(self, rhs: Self) -> Self::Output {
        Amount {
            value: self.value.saturating_add(rhs.value),
        }
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount { value: -self.value }
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
