//! Money amounts in the gateway's minor currency unit.
//!
//! The gateway only understands integer amounts in tiyin (1/100 of a som).
//! [`Amount`] always holds minor units; the constructors convert from the
//! major-unit figures callers usually work with.
//!
//! # Supported input formats
//!
//! - Whole major units: [`Amount::from_major`]
//! - Decimal strings: `"150"`, `"150.25"`, `"1,000.50"`, `"10.50 сум"`
//! - Raw minor units: [`Amount::from_minor`]
//!
//! ```
//! use paycom_types::amount::Amount;
//!
//! let amount: Amount = "1,000.50".parse().unwrap();
//! assert_eq!(amount.minor(), 100_050);
//! assert_eq!(Amount::from_major(100).unwrap().minor(), 10_000);
//! ```

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

/// Minor units per major unit (tiyin per som).
pub const MINOR_PER_MAJOR: i64 = 100;

/// Decimal places in a major-unit figure.
pub const MINOR_DIGITS: u32 = 2;

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\d\.\-]+").expect("valid regex"));

/// An amount in minor currency units.
///
/// Serialized as a bare JSON integer, which is what the gateway sends and expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

/// Errors that can occur when building an [`Amount`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountParseError {
    #[error("Invalid number format")]
    InvalidFormat,
    #[error("Amount does not fit into minor units")]
    OutOfRange,
    #[error("Negative value is not allowed")]
    Negative,
    #[error("Too big of a precision: {0} decimal places, at most {MINOR_DIGITS} allowed")]
    WrongPrecision(u32),
}

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Converts whole major units (som) into minor units.
    pub fn from_major(major: i64) -> Result<Self, AmountParseError> {
        major
            .checked_mul(MINOR_PER_MAJOR)
            .map(Amount)
            .ok_or(AmountParseError::OutOfRange)
    }

    /// Parses a human-readable major-unit figure.
    ///
    /// Currency symbols, thousand separators and whitespace are stripped before
    /// parsing. At most two decimal places are accepted.
    pub fn parse(input: &str) -> Result<Self, AmountParseError> {
        let cleaned = NON_NUMERIC.replace_all(input, "");
        let parsed = Decimal::from_str(&cleaned).map_err(|_| AmountParseError::InvalidFormat)?;
        if parsed.is_sign_negative() && !parsed.is_zero() {
            return Err(AmountParseError::Negative);
        }
        let normalized = parsed.normalize();
        if normalized.scale() > MINOR_DIGITS {
            return Err(AmountParseError::WrongPrecision(normalized.scale()));
        }
        let minor = normalized
            .checked_mul(Decimal::from(MINOR_PER_MAJOR))
            .and_then(|d| d.to_i64())
            .ok_or(AmountParseError::OutOfRange)?;
        Ok(Amount(minor))
    }

    /// The value in minor units, as sent on the wire.
    pub fn minor(&self) -> i64 {
        self.0
    }

    /// The value in major units, with two decimal places.
    pub fn to_major(&self) -> Decimal {
        Decimal::new(self.0, MINOR_DIGITS)
    }

    /// Formats the amount with the currency's symbol, e.g. `"100.00 сум"`.
    pub fn format_with(&self, currency: Currency) -> String {
        format!("{} {}", self.to_major(), currency.symbol())
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_major())
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::parse(s)
    }
}

impl TryFrom<&str> for Amount {
    type Error = AmountParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Amount::parse(value)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Amount)
    }
}

/// Currencies the gateway settles in, keyed by ISO 4217 numeric code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Currency {
    /// Uzbek som
    #[default]
    Uzs,
    Usd,
    Eur,
    Other(u16),
}

impl Currency {
    pub fn code(&self) -> u16 {
        match self {
            Currency::Uzs => 860,
            Currency::Usd => 840,
            Currency::Eur => 978,
            Currency::Other(code) => *code,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Uzs | Currency::Other(_) => "сум",
        }
    }
}

impl From<u16> for Currency {
    fn from(code: u16) -> Self {
        match code {
            860 => Currency::Uzs,
            840 => Currency::Usd,
            978 => Currency::Eur,
            other => Currency::Other(other),
        }
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.code())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u16::deserialize(deserializer).map(Currency::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_decorated() {
        assert_eq!(Amount::parse("150").unwrap().minor(), 15_000);
        assert_eq!(Amount::parse("150.25").unwrap().minor(), 15_025);
        assert_eq!(Amount::parse("1,000.5").unwrap().minor(), 100_050);
        assert_eq!(Amount::parse("10.50 сум").unwrap().minor(), 1_050);
        assert_eq!(Amount::parse("1.200").unwrap().minor(), 120);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(Amount::parse("abc"), Err(AmountParseError::InvalidFormat));
        assert_eq!(Amount::parse("-3"), Err(AmountParseError::Negative));
        assert_eq!(
            Amount::parse("0.001"),
            Err(AmountParseError::WrongPrecision(3))
        );
    }

    #[test]
    fn test_from_major_overflow() {
        assert_eq!(Amount::from_major(5).unwrap().minor(), 500);
        assert_eq!(
            Amount::from_major(i64::MAX),
            Err(AmountParseError::OutOfRange)
        );
    }

    #[test]
    fn test_format_with_currency() {
        let amount = Amount::from_minor(10_050);
        assert_eq!(amount.format_with(Currency::Uzs), "100.50 сум");
        assert_eq!(amount.format_with(Currency::Usd), "100.50 $");
        assert_eq!(amount.to_string(), "100.50");
    }

    #[test]
    fn test_serde_as_integer() {
        let json = serde_json::to_string(&Amount::from_minor(10_000)).unwrap();
        assert_eq!(json, "10000");
        let currency: Currency = serde_json::from_str("978").unwrap();
        assert_eq!(currency, Currency::Eur);
        let currency: Currency = serde_json::from_str("643").unwrap();
        assert_eq!(currency, Currency::Other(643));
    }
}
